// Company domain - tenants and their departments

pub mod models;

pub use models::{Company, CreateCompany, Department};
