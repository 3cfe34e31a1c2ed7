//! Server dependencies for engines and routes (using traits for testability)
//!
//! Central dependency container handed to the workflow engines and the HTTP
//! layer. External services sit behind trait abstractions so tests can swap
//! them for recording mocks.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use whatsapp::WhatsAppService;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseAuditRecorder, BaseNotificationService};

// =============================================================================
// WhatsAppService Adapter (implements BaseNotificationService trait)
// =============================================================================

/// Wrapper around WhatsAppService that implements BaseNotificationService
pub struct WhatsAppAdapter(pub Arc<WhatsAppService>);

impl WhatsAppAdapter {
    pub fn new(service: Arc<WhatsAppService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseNotificationService for WhatsAppAdapter {
    async fn send_status_update(
        &self,
        contact: &str,
        reference: &str,
        status_label: &str,
    ) -> Result<()> {
        let body = format!(
            "Update on your request {reference}: it is now \"{status_label}\". \
             Reply HELP for assistance."
        );
        self.0
            .send_text(contact, &body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn send_otp_code(&self, contact: &str, code: &str) -> Result<()> {
        let body = format!(
            "Your Citizen Desk verification code is {code}. It expires in a few minutes."
        );
        self.0
            .send_text(contact, &body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to engines and routes
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub notifier: Arc<dyn BaseNotificationService>,
    pub audit: Arc<dyn BaseAuditRecorder>,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        notifier: Arc<dyn BaseNotificationService>,
        audit: Arc<dyn BaseAuditRecorder>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            notifier,
            audit,
            jwt_service,
        }
    }
}
