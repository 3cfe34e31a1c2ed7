//! Grievance collection endpoints: intake bridge, listing, detail.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::{
    created_json, fail, internal_failure, ok_json, require_actor, RecordListQuery, Reply,
};
use crate::domains::audit::{AuditAction, NewAuditLog};
use crate::domains::grievance::{CreateGrievance, Grievance};
use crate::domains::workflow::{RecordType, StatusHistoryEntry, WorkflowRecord};
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

/// GET /api/grievances
pub async fn list_grievances_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Query(query): Query<RecordListQuery>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    // Super admins see every tenant; everyone else is pinned to their company.
    let company_id = if actor.is_super_admin() {
        None
    } else {
        match actor.company_id {
            Some(company) => Some(company),
            None => return fail(StatusCode::FORBIDDEN, "No company scope on this account"),
        }
    };

    match Grievance::find_with_filters(
        company_id,
        query.status.as_deref(),
        query.limit(),
        query.offset(),
        &state.db_pool,
    )
    .await
    {
        Ok(grievances) => ok_json(grievances),
        Err(e) => internal_failure(e),
    }
}

/// GET /api/grievances/:id - record plus its full status history
pub async fn get_grievance_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Path(id): Path<Uuid>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let grievance = match Grievance::find_by_id(id, &state.db_pool).await {
        Ok(Some(grievance)) => grievance,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Record not found"),
        Err(e) => return internal_failure(e.into()),
    };

    if !actor.can_act_on(grievance.company_id, grievance.department_id) {
        return fail(StatusCode::FORBIDDEN, "Not permitted to view this record");
    }

    let history =
        match StatusHistoryEntry::find_for_record(RecordType::Grievance, id, &state.db_pool).await {
            Ok(history) => history,
            Err(e) => return internal_failure(e),
        };

    ok_json(json!({ "record": grievance, "history": history }))
}

/// POST /api/grievances - intake bridge from the chatbot
pub async fn create_grievance_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Json(body): Json<CreateGrievance>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    if !actor.can_act_on(body.company_id, body.department_id) {
        return fail(
            StatusCode::FORBIDDEN,
            "Not permitted to create records in this scope",
        );
    }

    let grievance = match Grievance::create(body, &state.db_pool).await {
        Ok(grievance) => grievance,
        Err(e) => return internal_failure(e),
    };

    let entry = NewAuditLog {
        actor_id: Some(*actor.user_id.as_uuid()),
        company_id: Some(grievance.company_id),
        action: AuditAction::Create,
        resource_type: RecordType::Grievance.to_string(),
        resource_id: Some(grievance.id.into_uuid()),
        detail: json!({ "subject": grievance.subject, "status": grievance.status }),
        ip_address: actor.ip_address.clone(),
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(grievance_id = %grievance.id, error = %e, "Audit append failed");
    }

    created_json(grievance)
}
