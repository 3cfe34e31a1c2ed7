//! Postgres-backed audit recorder.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{AuditLog, NewAuditLog};
use crate::kernel::BaseAuditRecorder;

/// Appends audit entries to the `audit_logs` table.
pub struct PostgresAuditRecorder {
    pool: PgPool,
}

impl PostgresAuditRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAuditRecorder for PostgresAuditRecorder {
    async fn record(&self, entry: NewAuditLog) -> Result<()> {
        AuditLog::insert(&entry, &self.pool).await?;
        Ok(())
    }
}
