//! Assignment Engine.
//!
//! Validates and applies an assignee change: assignment is a company-admin
//! privilege, and the assignee must come from the record's company (and
//! department, when the record is department-scoped). Re-assignment always
//! overwrites.

use tracing::{debug, info};
use uuid::Uuid;

use super::effects;
use super::errors::WorkflowError;
use super::events::WorkflowEvent;
use super::record::WorkflowRecord;
use crate::common::{ActorContext, ActorRole};
use crate::domains::users::User;
use crate::kernel::ServerDeps;

const MAX_CAS_ATTEMPTS: u32 = 3;

/// Assign a record to a user.
pub async fn assign<R: WorkflowRecord>(
    record_id: Uuid,
    assignee_user_id: Uuid,
    actor: &ActorContext,
    deps: &ServerDeps,
) -> Result<R, WorkflowError> {
    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let record = R::find_by_id(record_id, &deps.db_pool)
            .await?
            .ok_or(WorkflowError::RecordNotFound)?;

        if !actor.can_assign(record.company_uuid()) {
            return Err(WorkflowError::Forbidden);
        }

        let assignee = User::find_by_id(assignee_user_id, &deps.db_pool)
            .await?
            .filter(|u| u.active)
            .ok_or(WorkflowError::UserNotFound)?;

        if !assignee_in_scope(&assignee, record.company_uuid(), record.department_uuid()) {
            return Err(WorkflowError::OutOfScopeAssignee);
        }

        let previous = record.assignee_uuid();
        let updated = R::persist_assignee(
            record_id,
            record.record_version(),
            assignee_user_id,
            &deps.db_pool,
        )
        .await?;

        let Some(updated) = updated else {
            debug!(record_id = %record_id, attempt, "Lost assignee CAS, reloading record");
            continue;
        };

        info!(
            record_id = %record_id,
            record_type = %R::RECORD_TYPE,
            assignee = %assignee_user_id,
            "Record assigned"
        );

        effects::dispatch(
            WorkflowEvent::Assigned {
                record_type: R::RECORD_TYPE,
                record_id,
                company_id: updated.company_uuid(),
                previous_assignee: previous,
                new_assignee: assignee_user_id,
                actor_id: Some(*actor.user_id.as_uuid()),
                ip_address: actor.ip_address.clone(),
            },
            deps,
        );

        return Ok(updated);
    }

    Err(WorkflowError::Conflict)
}

/// Whether a candidate assignee sits inside the record's scope.
///
/// Company must always match. Department-scoped records additionally require
/// a department match, except for company admins, who span every department
/// of their company.
pub(crate) fn assignee_in_scope(
    user: &User,
    company_id: Uuid,
    department_id: Option<Uuid>,
) -> bool {
    if user.company_id != Some(company_id) {
        return false;
    }
    match department_id {
        Some(dept) => {
            user.department_id == Some(dept)
                || matches!(user.role(), Ok(ActorRole::CompanyAdmin))
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ActorContext, UserId};
    use crate::domains::auth::JwtService;
    use crate::domains::workflow::testing::TestRecord;
    use crate::kernel::test_dependencies::{RecordingAuditRecorder, RecordingNotifier};
    use chrono::Utc;
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

    #[tokio::test]
    async fn missing_record_fails_not_found() {
        let deps = test_deps();
        let actor = ActorContext {
            user_id: UserId::new(),
            role: ActorRole::SuperAdmin,
            company_id: None,
            department_id: None,
            ip_address: None,
        };

        let result =
            assign::<TestRecord>(Uuid::new_v4(), Uuid::new_v4(), &actor, &deps).await;

        assert!(matches!(result, Err(WorkflowError::RecordNotFound)));
    }

    #[tokio::test]
    async fn staff_cannot_assign() {
        let deps = test_deps();
        let company = Uuid::new_v4();
        let id = TestRecord::pending(company, None).store();

        let actor = ActorContext {
            user_id: UserId::new(),
            role: ActorRole::Staff,
            company_id: Some(company),
            department_id: None,
            ip_address: None,
        };

        let result = assign::<TestRecord>(id, Uuid::new_v4(), &actor, &deps).await;

        assert!(matches!(result, Err(WorkflowError::Forbidden)));
        assert_eq!(TestRecord::fetch(id).unwrap().assigned_to, None);
    }

    #[tokio::test]
    async fn admin_of_other_company_cannot_assign() {
        let deps = test_deps();
        let id = TestRecord::pending(Uuid::new_v4(), None).store();

        let actor = ActorContext {
            user_id: UserId::new(),
            role: ActorRole::CompanyAdmin,
            company_id: Some(Uuid::new_v4()),
            department_id: None,
            ip_address: None,
        };

        let result = assign::<TestRecord>(id, Uuid::new_v4(), &actor, &deps).await;

        assert!(matches!(result, Err(WorkflowError::Forbidden)));
    }

    fn user(role: &str, company: Option<Uuid>, department: Option<Uuid>) -> User {
        User {
            id: UserId::new(),
            name: "Ravi".to_string(),
            phone_number: "+919812345678".to_string(),
            role: role.to_string(),
            company_id: company,
            department_id: department,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rejects_other_company() {
        let company = Uuid::new_v4();
        let candidate = user("staff", Some(Uuid::new_v4()), None);
        assert!(!assignee_in_scope(&candidate, company, None));
    }

    #[test]
    fn accepts_same_company_unscoped_record() {
        let company = Uuid::new_v4();
        let candidate = user("staff", Some(company), Some(Uuid::new_v4()));
        assert!(assignee_in_scope(&candidate, company, None));
    }

    #[test]
    fn department_scoped_record_requires_department_match_for_staff() {
        let company = Uuid::new_v4();
        let dept = Uuid::new_v4();
        let in_dept = user("staff", Some(company), Some(dept));
        let other_dept = user("staff", Some(company), Some(Uuid::new_v4()));
        let no_dept = user("staff", Some(company), None);

        assert!(assignee_in_scope(&in_dept, company, Some(dept)));
        assert!(!assignee_in_scope(&other_dept, company, Some(dept)));
        assert!(!assignee_in_scope(&no_dept, company, Some(dept)));
    }

    #[test]
    fn company_admin_spans_departments() {
        let company = Uuid::new_v4();
        let dept = Uuid::new_v4();
        let admin = user("company_admin", Some(company), None);
        assert!(assignee_in_scope(&admin, company, Some(dept)));
    }
}
