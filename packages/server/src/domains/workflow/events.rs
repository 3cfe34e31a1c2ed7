use uuid::Uuid;

use super::record::RecordType;

/// Workflow domain events - FACT EVENTS ONLY
///
/// Immutable facts about a committed mutation. The effects module watches
/// these and fires the best-effort follow-ups (citizen notification, audit
/// trail). Errors go in `Result::Err`, not in events.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// A record's status was persisted
    StatusChanged {
        record_type: RecordType,
        record_id: Uuid,
        /// Human-readable reference used in the citizen message.
        reference: String,
        company_id: Uuid,
        citizen_contact: String,
        from_status: String,
        to_status: String,
        /// Display form of the new status.
        to_label: String,
        /// Whether this transition closes out the request (audited as
        /// `resolve` rather than `update`).
        is_resolution: bool,
        actor_id: Option<Uuid>,
        ip_address: Option<String>,
    },

    /// A record was (re)assigned
    Assigned {
        record_type: RecordType,
        record_id: Uuid,
        company_id: Uuid,
        previous_assignee: Option<Uuid>,
        new_assignee: Uuid,
        actor_id: Option<Uuid>,
        ip_address: Option<String>,
    },
}
