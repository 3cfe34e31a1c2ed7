//! Status Transition Engine.
//!
//! Validates and applies a status change to a single record: scope-checked,
//! no-op-rejected, persisted atomically with its history entry, then
//! follow-ups (citizen notification, audit) fire best-effort.

use tracing::{debug, info};
use uuid::Uuid;

use super::effects;
use super::errors::WorkflowError;
use super::events::WorkflowEvent;
use super::history::StatusHistoryEntry;
use super::record::{RecordStatus, WorkflowRecord};
use crate::common::ActorContext;
use crate::kernel::ServerDeps;

/// Attempts before a lost version CAS becomes a `Conflict` error.
const MAX_CAS_ATTEMPTS: u32 = 3;

/// Transition a record to a new status.
///
/// Any status may move to any other distinct member of the variant's enum;
/// there is no adjacency table. The requested status arrives as text from
/// the HTTP layer and is validated against the variant's enum here.
pub async fn transition_status<R: WorkflowRecord>(
    record_id: Uuid,
    requested_status: &str,
    remarks: Option<String>,
    actor: &ActorContext,
    deps: &ServerDeps,
) -> Result<R, WorkflowError> {
    let new_status = R::Status::parse(requested_status)
        .ok_or_else(|| WorkflowError::InvalidStatus(requested_status.to_string()))?;

    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let record = R::find_by_id(record_id, &deps.db_pool)
            .await?
            .ok_or(WorkflowError::RecordNotFound)?;

        if !actor.can_act_on(record.company_uuid(), record.department_uuid()) {
            return Err(WorkflowError::Forbidden);
        }

        let before = record.status_text().to_string();
        if before == new_status.as_str() {
            return Err(WorkflowError::NoOpTransition(before));
        }

        // Status write and history append commit together; the CAS on the
        // version stamp catches concurrent writers.
        let mut tx = deps.db_pool.begin().await?;
        let updated =
            R::persist_status(record_id, record.record_version(), new_status, &mut tx).await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            debug!(record_id = %record_id, attempt, "Lost status CAS, reloading record");
            continue;
        };

        StatusHistoryEntry::append(
            R::RECORD_TYPE,
            record_id,
            new_status.as_str(),
            remarks.as_deref(),
            Some(*actor.user_id.as_uuid()),
            &mut tx,
        )
        .await?;
        tx.commit().await?;

        info!(
            record_id = %record_id,
            record_type = %R::RECORD_TYPE,
            from = %before,
            to = new_status.as_str(),
            "Record status updated"
        );

        effects::dispatch(
            WorkflowEvent::StatusChanged {
                record_type: R::RECORD_TYPE,
                record_id,
                reference: updated.reference(),
                company_id: updated.company_uuid(),
                citizen_contact: updated.citizen_contact().to_string(),
                from_status: before,
                to_status: new_status.as_str().to_string(),
                to_label: new_status.label().to_string(),
                is_resolution: new_status.is_resolution(),
                actor_id: Some(*actor.user_id.as_uuid()),
                ip_address: actor.ip_address.clone(),
            },
            deps,
        );

        return Ok(updated);
    }

    Err(WorkflowError::Conflict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ActorRole, UserId};
    use crate::domains::auth::JwtService;
    use crate::domains::workflow::testing::TestRecord;
    use crate::kernel::test_dependencies::{RecordingAuditRecorder, RecordingNotifier};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn test_deps() -> ServerDeps {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/citizen_desk_test")
            .unwrap();
        ServerDeps::new(
            pool,
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingAuditRecorder::new()),
            Arc::new(JwtService::new("test_secret", "test_issuer".to_string())),
        )
    }

    fn admin_of(company: Uuid) -> ActorContext {
        ActorContext {
            user_id: UserId::new(),
            role: ActorRole::CompanyAdmin,
            company_id: Some(company),
            department_id: None,
            ip_address: None,
        }
    }

    #[tokio::test]
    async fn unknown_status_is_rejected_before_any_lookup() {
        let deps = test_deps();
        let actor = admin_of(Uuid::new_v4());

        let result =
            transition_status::<TestRecord>(Uuid::new_v4(), "escalated", None, &actor, &deps)
                .await;

        assert!(matches!(result, Err(WorkflowError::InvalidStatus(s)) if s == "escalated"));
    }

    #[tokio::test]
    async fn missing_record_fails_not_found() {
        let deps = test_deps();
        let actor = admin_of(Uuid::new_v4());

        let result =
            transition_status::<TestRecord>(Uuid::new_v4(), "resolved", None, &actor, &deps).await;

        assert!(matches!(result, Err(WorkflowError::RecordNotFound)));
    }

    #[tokio::test]
    async fn same_status_fails_no_op_and_leaves_record_untouched() {
        let deps = test_deps();
        let company = Uuid::new_v4();
        let actor = admin_of(company);
        let id = TestRecord::pending(company, None).store();

        let result = transition_status::<TestRecord>(
            id,
            "pending",
            Some("still pending".to_string()),
            &actor,
            &deps,
        )
        .await;

        assert!(matches!(result, Err(WorkflowError::NoOpTransition(s)) if s == "pending"));
        let record = TestRecord::fetch(id).unwrap();
        assert_eq!(record.status, "pending");
        assert_eq!(record.version, 0);
    }

    #[tokio::test]
    async fn out_of_company_actor_is_forbidden() {
        let deps = test_deps();
        let actor = admin_of(Uuid::new_v4());
        let id = TestRecord::pending(Uuid::new_v4(), None).store();

        let result =
            transition_status::<TestRecord>(id, "in_progress", None, &actor, &deps).await;

        assert!(matches!(result, Err(WorkflowError::Forbidden)));
        assert_eq!(TestRecord::fetch(id).unwrap().status, "pending");
    }

    #[tokio::test]
    async fn staff_of_other_department_is_forbidden() {
        let deps = test_deps();
        let company = Uuid::new_v4();
        let id = TestRecord::pending(company, Some(Uuid::new_v4())).store();

        let actor = ActorContext {
            user_id: UserId::new(),
            role: ActorRole::Staff,
            company_id: Some(company),
            department_id: Some(Uuid::new_v4()),
            ip_address: None,
        };

        let result =
            transition_status::<TestRecord>(id, "in_progress", None, &actor, &deps).await;

        assert!(matches!(result, Err(WorkflowError::Forbidden)));
    }
}
