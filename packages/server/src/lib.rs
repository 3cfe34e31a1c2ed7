// Citizen Desk - API Core
//
// Backend for a multi-tenant grievance and appointment administration
// platform. Citizens interact through a WhatsApp chatbot; company admins and
// department staff work records through the dashboard that consumes this API.
//
// Architecture follows domain-driven design: models own persistence,
// the workflow domain owns status/assignment semantics, and the kernel
// provides infrastructure traits for side-effect collaborators.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
