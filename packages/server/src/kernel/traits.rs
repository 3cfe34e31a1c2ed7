// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "transition a grievance") lives in domain functions
// that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseNotificationService)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::audit::NewAuditLog;

// =============================================================================
// Notification Service Trait (Infrastructure - WhatsApp delivery)
// =============================================================================

#[async_trait]
pub trait BaseNotificationService: Send + Sync {
    /// Tell a citizen their record moved to a new status.
    ///
    /// `reference` is the human-readable record reference (e.g. "GRV-0192ab34"),
    /// `status_label` the new status in display form.
    async fn send_status_update(
        &self,
        contact: &str,
        reference: &str,
        status_label: &str,
    ) -> Result<()>;

    /// Deliver a login verification code.
    async fn send_otp_code(&self, contact: &str, code: &str) -> Result<()>;
}

// =============================================================================
// Audit Recorder Trait (Infrastructure - append-only trail)
// =============================================================================

#[async_trait]
pub trait BaseAuditRecorder: Send + Sync {
    /// Append one entry. Implementations must not update or delete.
    async fn record(&self, entry: NewAuditLog) -> Result<()>;
}
