// Domain modules
//
// Each domain owns its models and logic. The workflow domain is the only
// mutation path for record status and assignment.

pub mod appointment;
pub mod audit;
pub mod auth;
pub mod company;
pub mod grievance;
pub mod users;
pub mod workflow;
