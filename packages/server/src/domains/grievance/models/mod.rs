pub mod grievance;

pub use grievance::{CreateGrievance, Grievance, GrievanceStatus};
