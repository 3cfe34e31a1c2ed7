//! The seam between the workflow engines and the two record variants.
//!
//! Grievances and appointments are two tables with the same workflow shape:
//! a status column, an optional assignee, company/department scoping and a
//! version stamp. The engines are generic over this trait; the models own
//! their SQL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Which record table a workflow call operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Grievance,
    Appointment,
}

impl RecordType {
    /// Prefix of the human-readable reference shown to citizens.
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            RecordType::Grievance => "GRV",
            RecordType::Appointment => "APT",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Grievance => write!(f, "grievance"),
            RecordType::Appointment => write!(f, "appointment"),
        }
    }
}

impl std::str::FromStr for RecordType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        // Accept both the singular form and the plural path segment.
        match s {
            "grievance" | "grievances" => Ok(RecordType::Grievance),
            "appointment" | "appointments" => Ok(RecordType::Appointment),
            _ => Err(anyhow::anyhow!("Invalid record type: {}", s)),
        }
    }
}

/// A variant-specific status enum.
///
/// `as_str` is the stored text form, `label` the citizen-facing wording used
/// in notifications.
pub trait RecordStatus:
    Sized + Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    fn parse(s: &str) -> Option<Self>;
    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;
    /// Statuses audited as `resolve` instead of `update`.
    fn is_resolution(&self) -> bool;
}

/// Persistence contract both record variants implement.
///
/// `persist_*` methods are compare-and-swap on the version stamp: they
/// return `None` when the row moved underneath the caller, who reloads and
/// revalidates.
#[async_trait]
pub trait WorkflowRecord: Sized + Send + Sync + 'static {
    type Status: RecordStatus;

    const RECORD_TYPE: RecordType;

    fn record_uuid(&self) -> Uuid;
    fn company_uuid(&self) -> Uuid;
    fn department_uuid(&self) -> Option<Uuid>;
    fn assignee_uuid(&self) -> Option<Uuid>;
    fn citizen_contact(&self) -> &str;
    fn status_text(&self) -> &str;
    fn record_version(&self) -> i64;

    /// Human-readable reference, e.g. "GRV-0192ab34".
    fn reference(&self) -> String {
        let id = self.record_uuid().simple().to_string();
        format!("{}-{}", Self::RECORD_TYPE.reference_prefix(), &id[..8])
    }

    async fn find_by_id(id: Uuid, pool: &PgPool) -> sqlx::Result<Option<Self>>;

    /// CAS the status column; runs inside the caller's transaction so the
    /// history append commits atomically with it.
    async fn persist_status(
        id: Uuid,
        expected_version: i64,
        status: Self::Status,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>>;

    /// CAS the assignee column.
    async fn persist_assignee(
        id: Uuid,
        expected_version: i64,
        assignee: Uuid,
        pool: &PgPool,
    ) -> sqlx::Result<Option<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_parses_path_segments() {
        assert_eq!("grievances".parse::<RecordType>().unwrap(), RecordType::Grievance);
        assert_eq!("grievance".parse::<RecordType>().unwrap(), RecordType::Grievance);
        assert_eq!(
            "appointments".parse::<RecordType>().unwrap(),
            RecordType::Appointment
        );
        assert!("tickets".parse::<RecordType>().is_err());
    }

    #[test]
    fn record_type_text_is_singular() {
        assert_eq!(RecordType::Grievance.to_string(), "grievance");
        assert_eq!(RecordType::Appointment.to_string(), "appointment");
    }
}
