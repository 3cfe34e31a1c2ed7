// Common types and utilities shared across the application

pub mod actor;
pub mod entity_ids;
pub mod id;
pub mod response;

pub use actor::{ActorContext, ActorRole};
pub use entity_ids::{
    AppointmentId, AuditLogId, CompanyId, DepartmentId, GrievanceId, UserId,
};
pub use id::{Id, V4, V7};
pub use response::ApiResponse;
