use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::AppointmentId;
use crate::domains::workflow::{RecordStatus, RecordType, WorkflowRecord};

/// Appointment status enum for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            _ => Err(anyhow::anyhow!("Invalid appointment status: {}", s)),
        }
    }
}

impl RecordStatus for AppointmentStatus {
    fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
        }
    }

    fn is_resolution(&self) -> bool {
        matches!(self, AppointmentStatus::Completed)
    }
}

/// Appointment model - SQL persistence layer
///
/// Booked by the chatbot intake bridge in status `pending`, unassigned.
/// Status and assignee change only through the workflow engines.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub company_id: Uuid,
    pub department_id: Option<Uuid>,
    pub citizen_name: String,
    pub citizen_contact: String,
    pub purpose: String,
    pub scheduled_for: DateTime<Utc>,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    /// Optimistic-concurrency stamp; bumped by every engine mutation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the intake bridge
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    pub company_id: Uuid,
    pub department_id: Option<Uuid>,
    pub citizen_name: String,
    pub citizen_contact: String,
    pub purpose: String,
    pub scheduled_for: DateTime<Utc>,
}

impl Appointment {
    /// Insert a new appointment in the initial state
    pub async fn create(input: CreateAppointment, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO appointments (
                company_id, department_id, citizen_name, citizen_contact,
                purpose, scheduled_for, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(input.company_id)
        .bind(input.department_id)
        .bind(&input.citizen_name)
        .bind(&input.citizen_contact)
        .bind(&input.purpose)
        .bind(input.scheduled_for)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// List appointments with optional filters, soonest first
    pub async fn find_with_filters(
        company_id: Option<Uuid>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM appointments
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY scheduled_for ASC
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
impl WorkflowRecord for Appointment {
    type Status = AppointmentStatus;

    const RECORD_TYPE: RecordType = RecordType::Appointment;

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
        sqlx::query_as::<_, Self>("SELECT * FROM appointments WHERE id = $1")
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
            UPDATE appointments
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
            UPDATE appointments
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
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            let parsed: AppointmentStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert!(AppointmentStatus::parse("resolved").is_none());
    }

    #[test]
    fn only_completed_is_a_resolution() {
        assert!(AppointmentStatus::Completed.is_resolution());
        assert!(!AppointmentStatus::Cancelled.is_resolution());
        assert!(!AppointmentStatus::NoShow.is_resolution());
    }

    #[test]
    fn reference_uses_appointment_prefix() {
        let appointment = Appointment {
            id: AppointmentId::new(),
            company_id: Uuid::new_v4(),
            department_id: None,
            citizen_name: "Meena".to_string(),
            citizen_contact: "+919876543210".to_string(),
            purpose: "Water connection".to_string(),
            scheduled_for: Utc::now(),
            status: "pending".to_string(),
            assigned_to: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(appointment.reference().starts_with("APT-"));
    }
}
