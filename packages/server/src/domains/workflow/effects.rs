//! Best-effort follow-ups after a committed workflow mutation.
//!
//! The primary state change has already been persisted when these run.
//! Notification and audit are independent: each failure is logged with
//! enough context for operational follow-up and never rolls back or fails
//! the originating request.

use serde_json::json;
use tracing::error;

use super::events::WorkflowEvent;
use crate::domains::audit::{AuditAction, NewAuditLog};
use crate::kernel::ServerDeps;

/// Fire the follow-ups for a committed event without blocking the caller.
pub fn dispatch(event: WorkflowEvent, deps: &ServerDeps) {
    let deps = deps.clone();
    tokio::spawn(async move {
        run_follow_ups(event, &deps).await;
    });
}

/// Run the follow-ups to completion. Never fails; split out from
/// [`dispatch`] so tests can await it directly.
pub(crate) async fn run_follow_ups(event: WorkflowEvent, deps: &ServerDeps) {
    match event {
        WorkflowEvent::StatusChanged {
            record_type,
            record_id,
            reference,
            company_id,
            citizen_contact,
            from_status,
            to_status,
            to_label,
            is_resolution,
            actor_id,
            ip_address,
        } => {
            if let Err(e) = deps
                .notifier
                .send_status_update(&citizen_contact, &reference, &to_label)
                .await
            {
                error!(
                    record_id = %record_id,
                    contact = %citizen_contact,
                    error = %e,
                    "Citizen status notification failed"
                );
            }

            let action = if is_resolution {
                AuditAction::Resolve
            } else {
                AuditAction::Update
            };
            let entry = NewAuditLog {
                actor_id,
                company_id: Some(company_id),
                action,
                resource_type: record_type.to_string(),
                resource_id: Some(record_id),
                detail: json!({
                    "status": { "before": from_status, "after": to_status }
                }),
                ip_address,
            };
            if let Err(e) = deps.audit.record(entry).await {
                error!(record_id = %record_id, error = %e, "Audit append failed");
            }
        }

        WorkflowEvent::Assigned {
            record_type,
            record_id,
            company_id,
            previous_assignee,
            new_assignee,
            actor_id,
            ip_address,
        } => {
            let entry = NewAuditLog {
                actor_id,
                company_id: Some(company_id),
                action: AuditAction::Assign,
                resource_type: record_type.to_string(),
                resource_id: Some(record_id),
                detail: json!({
                    "assigned_to": { "before": previous_assignee, "after": new_assignee }
                }),
                ip_address,
            };
            if let Err(e) = deps.audit.record(entry).await {
                error!(record_id = %record_id, error = %e, "Audit append failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::JwtService;
    use crate::domains::workflow::record::RecordType;
    use crate::kernel::test_dependencies::{RecordingAuditRecorder, RecordingNotifier};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use uuid::Uuid;

    fn test_deps(
        notifier: Arc<RecordingNotifier>,
        audit: Arc<RecordingAuditRecorder>,
    ) -> ServerDeps {
        // Lazy pool: never actually connects in these tests.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/citizen_desk_test")
            .unwrap();
        ServerDeps::new(
            pool,
            notifier,
            audit,
            Arc::new(JwtService::new("test_secret", "test_issuer".to_string())),
        )
    }

    fn status_changed(contact: &str) -> WorkflowEvent {
        WorkflowEvent::StatusChanged {
            record_type: RecordType::Grievance,
            record_id: Uuid::new_v4(),
            reference: "GRV-0192ab34".to_string(),
            company_id: Uuid::new_v4(),
            citizen_contact: contact.to_string(),
            from_status: "pending".to_string(),
            to_status: "in_progress".to_string(),
            to_label: "In Progress".to_string(),
            is_resolution: false,
            actor_id: Some(Uuid::new_v4()),
            ip_address: Some("10.0.0.1".to_string()),
        }
    }

    #[tokio::test]
    async fn notifies_citizen_and_audits_transition() {
        let notifier = Arc::new(RecordingNotifier::new());
        let audit = Arc::new(RecordingAuditRecorder::new());
        let deps = test_deps(notifier.clone(), audit.clone());

        run_follow_ups(status_changed("+919876543210"), &deps).await;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+919876543210");
        assert_eq!(sent[0].2, "In Progress");

        let entries = audit.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Update);
        assert_eq!(entries[0].resource_type, "grievance");
    }

    #[tokio::test]
    async fn notification_failure_still_audits() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let audit = Arc::new(RecordingAuditRecorder::new());
        let deps = test_deps(notifier, audit.clone());

        run_follow_ups(status_changed("+919876543210"), &deps).await;

        // Audit trail is written even though the citizen could not be reached.
        assert_eq!(audit.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn audit_failure_is_swallowed() {
        let notifier = Arc::new(RecordingNotifier::new());
        let audit = Arc::new(RecordingAuditRecorder::failing());
        let deps = test_deps(notifier.clone(), audit);

        // Must complete without panicking or propagating the error.
        run_follow_ups(status_changed("+919876543210"), &deps).await;
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolution_transitions_audit_as_resolve() {
        let notifier = Arc::new(RecordingNotifier::new());
        let audit = Arc::new(RecordingAuditRecorder::new());
        let deps = test_deps(notifier, audit.clone());

        let mut event = status_changed("+919876543210");
        if let WorkflowEvent::StatusChanged {
            ref mut is_resolution,
            ..
        } = event
        {
            *is_resolution = true;
        }
        run_follow_ups(event, &deps).await;

        assert_eq!(audit.entries.lock().unwrap()[0].action, AuditAction::Resolve);
    }

    #[tokio::test]
    async fn assignment_audits_without_notifying() {
        let notifier = Arc::new(RecordingNotifier::new());
        let audit = Arc::new(RecordingAuditRecorder::new());
        let deps = test_deps(notifier.clone(), audit.clone());

        run_follow_ups(
            WorkflowEvent::Assigned {
                record_type: RecordType::Appointment,
                record_id: Uuid::new_v4(),
                company_id: Uuid::new_v4(),
                previous_assignee: None,
                new_assignee: Uuid::new_v4(),
                actor_id: Some(Uuid::new_v4()),
                ip_address: None,
            },
            &deps,
        )
        .await;

        assert!(notifier.sent.lock().unwrap().is_empty());
        let entries = audit.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Assign);
        assert_eq!(entries[0].resource_type, "appointment");
    }
}
