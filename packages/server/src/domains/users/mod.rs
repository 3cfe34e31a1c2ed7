// Users domain - dashboard users and the scoped assignment pool

pub mod models;

pub use models::{CreateUser, User};
