use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::GrievanceId;
use crate::domains::workflow::{RecordStatus, RecordType, WorkflowRecord};

/// Grievance status enum for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
    Cancelled,
}

impl std::fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GrievanceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(GrievanceStatus::Pending),
            "in_progress" => Ok(GrievanceStatus::InProgress),
            "resolved" => Ok(GrievanceStatus::Resolved),
            "closed" => Ok(GrievanceStatus::Closed),
            "cancelled" => Ok(GrievanceStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid grievance status: {}", s)),
        }
    }
}

impl RecordStatus for GrievanceStatus {
    fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn as_str(&self) -> &'static str {
        match self {
            GrievanceStatus::Pending => "pending",
            GrievanceStatus::InProgress => "in_progress",
            GrievanceStatus::Resolved => "resolved",
            GrievanceStatus::Closed => "closed",
            GrievanceStatus::Cancelled => "cancelled",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            GrievanceStatus::Pending => "Pending",
            GrievanceStatus::InProgress => "In Progress",
            GrievanceStatus::Resolved => "Resolved",
            GrievanceStatus::Closed => "Closed",
            GrievanceStatus::Cancelled => "Cancelled",
        }
    }

    fn is_resolution(&self) -> bool {
        matches!(self, GrievanceStatus::Resolved)
    }
}

/// Grievance model - SQL persistence layer
///
/// Created by the chatbot intake bridge in status `pending`, unassigned.
/// Status and assignee change only through the workflow engines.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Grievance {
    pub id: GrievanceId,
    pub company_id: Uuid,
    pub department_id: Option<Uuid>,
    pub citizen_name: String,
    pub citizen_contact: String,
    pub subject: String,
    pub description: Option<String>,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    /// Optimistic-concurrency stamp; bumped by every engine mutation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the intake bridge
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGrievance {
    pub company_id: Uuid,
    pub department_id: Option<Uuid>,
    pub citizen_name: String,
    pub citizen_contact: String,
    pub subject: String,
    pub description: Option<String>,
}

impl Grievance {
    /// Insert a new grievance in the initial state
    pub async fn create(input: CreateGrievance, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO grievances (
                company_id, department_id, citizen_name, citizen_contact,
                subject, description, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(input.company_id)
        .bind(input.department_id)
        .bind(&input.citizen_name)
        .bind(&input.citizen_contact)
        .bind(&input.subject)
        .bind(&input.description)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// List grievances with optional filters, newest first
    pub async fn find_with_filters(
        company_id: Option<Uuid>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM grievances
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(company_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

#[async_trait]
impl WorkflowRecord for Grievance {
    type Status = GrievanceStatus;

    const RECORD_TYPE: RecordType = RecordType::Grievance;

    fn record_uuid(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn company_uuid(&self) -> Uuid {
        self.company_id
    }

    fn department_uuid(&self) -> Option<Uuid> {
        self.department_id
    }

    fn assignee_uuid(&self) -> Option<Uuid> {
        self.assigned_to
    }

    fn citizen_contact(&self) -> &str {
        &self.citizen_contact
    }

    fn status_text(&self) -> &str {
        &self.status
    }

    fn record_version(&self) -> i64 {
        self.version
    }

    async fn find_by_id(id: Uuid, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM grievances WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn persist_status(
        id: Uuid,
        expected_version: i64,
        status: Self::Status,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE grievances
            SET status = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(status.as_str())
        .fetch_optional(&mut *conn)
        .await
    }

    async fn persist_assignee(
        id: Uuid,
        expected_version: i64,
        assignee: Uuid,
        pool: &PgPool,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE grievances
            SET assigned_to = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(assignee)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::workflow::WorkflowRecord;

    #[test]
    fn status_text_roundtrip() {
        for status in [
            GrievanceStatus::Pending,
            GrievanceStatus::InProgress,
            GrievanceStatus::Resolved,
            GrievanceStatus::Closed,
            GrievanceStatus::Cancelled,
        ] {
            let parsed: GrievanceStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
            assert_eq!(GrievanceStatus::parse(status.as_str()), Some(status));
        }
        assert!(GrievanceStatus::parse("confirmed").is_none());
    }

    #[test]
    fn only_resolved_is_a_resolution() {
        assert!(GrievanceStatus::Resolved.is_resolution());
        assert!(!GrievanceStatus::Closed.is_resolution());
        assert!(!GrievanceStatus::Cancelled.is_resolution());
    }

    #[test]
    fn reference_uses_grievance_prefix() {
        let grievance = Grievance {
            id: GrievanceId::new(),
            company_id: Uuid::new_v4(),
            department_id: None,
            citizen_name: "Meena".to_string(),
            citizen_contact: "+919876543210".to_string(),
            subject: "Street light broken".to_string(),
            description: None,
            status: "pending".to_string(),
            assigned_to: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let reference = grievance.reference();
        assert!(reference.starts_with("GRV-"));
        assert_eq!(reference.len(), "GRV-".len() + 8);
    }
}
