// Grievance domain - citizen complaints worked through the status lifecycle

pub mod models;

pub use models::{CreateGrievance, Grievance, GrievanceStatus};
