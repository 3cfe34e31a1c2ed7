//! Typed ID definitions for all domain entities.
//!
//! Type aliases for each domain entity, providing compile-time type safety
//! for ID usage throughout the application.

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Grievance records.
pub struct Grievance;

/// Marker type for Appointment records.
pub struct Appointment;

/// Marker type for User entities (dashboard users).
pub struct User;

/// Marker type for Company entities (tenants).
pub struct Company;

/// Marker type for Department entities.
pub struct Department;

/// Marker type for audit log entries.
pub struct AuditLog;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Grievance records.
pub type GrievanceId = Id<Grievance>;

/// Typed ID for Appointment records.
pub type AppointmentId = Id<Appointment>;

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Company entities.
pub type CompanyId = Id<Company>;

/// Typed ID for Department entities.
pub type DepartmentId = Id<Department>;

/// Typed ID for audit log entries.
pub type AuditLogId = Id<AuditLog>;
