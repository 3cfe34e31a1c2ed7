use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::AuditLogId;

/// Audit action enum for type-safe recording
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Assign,
    Resolve,
    Login,
    Logout,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "create"),
            AuditAction::Update => write!(f, "update"),
            AuditAction::Delete => write!(f, "delete"),
            AuditAction::Assign => write!(f, "assign"),
            AuditAction::Resolve => write!(f, "resolve"),
            AuditAction::Login => write!(f, "login"),
            AuditAction::Logout => write!(f, "logout"),
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            "assign" => Ok(AuditAction::Assign),
            "resolve" => Ok(AuditAction::Resolve),
            "login" => Ok(AuditAction::Login),
            "logout" => Ok(AuditAction::Logout),
            _ => Err(anyhow::anyhow!("Invalid audit action: {}", s)),
        }
    }
}

/// Audit log model - append-only activity trail
///
/// Written best-effort by the engines, read by the recent-activity feed.
/// Rows are never updated or deleted.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub actor_id: Option<Uuid>,
    /// Company the touched resource belongs to; scopes the activity feed.
    pub company_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    /// Before/after change payload.
    pub detail: Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for appending an audit entry
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub actor_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub detail: Value,
    pub ip_address: Option<String>,
}

impl AuditLog {
    /// Append an entry
    pub async fn insert(entry: &NewAuditLog, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO audit_logs (
                actor_id, company_id, action, resource_type, resource_id,
                detail, ip_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(entry.actor_id)
        .bind(entry.company_id)
        .bind(entry.action.to_string())
        .bind(&entry.resource_type)
        .bind(entry.resource_id)
        .bind(&entry.detail)
        .bind(&entry.ip_address)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest entries for the recent-activity feed.
    ///
    /// `company_id` limits the feed to one tenant; `None` returns the
    /// platform-wide feed (super admin).
    pub async fn find_recent(
        company_id: Option<Uuid>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM audit_logs
            WHERE ($1::uuid IS NULL OR company_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_text_roundtrip() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Assign,
            AuditAction::Resolve,
            AuditAction::Login,
            AuditAction::Logout,
        ] {
            let parsed: AuditAction = action.to_string().parse().unwrap();
            assert_eq!(parsed, action);
        }
        assert!("approve".parse::<AuditAction>().is_err());
    }
}
