// Audit domain - append-only activity trail

pub mod models;
pub mod recorder;

pub use models::{AuditAction, AuditLog, NewAuditLog};
pub use recorder::PostgresAuditRecorder;
