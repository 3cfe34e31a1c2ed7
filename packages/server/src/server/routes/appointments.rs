//! Appointment collection endpoints: intake bridge, listing, detail.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::{
    created_json, fail, internal_failure, ok_json, require_actor, RecordListQuery, Reply,
};
use crate::domains::appointment::{Appointment, CreateAppointment};
use crate::domains::audit::{AuditAction, NewAuditLog};
use crate::domains::workflow::{RecordType, StatusHistoryEntry, WorkflowRecord};
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

/// GET /api/appointments
pub async fn list_appointments_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Query(query): Query<RecordListQuery>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let company_id = if actor.is_super_admin() {
        None
    } else {
        match actor.company_id {
            Some(company) => Some(company),
            None => return fail(StatusCode::FORBIDDEN, "No company scope on this account"),
        }
    };

    match Appointment::find_with_filters(
        company_id,
        query.status.as_deref(),
        query.limit(),
        query.offset(),
        &state.db_pool,
    )
    .await
    {
        Ok(appointments) => ok_json(appointments),
        Err(e) => internal_failure(e),
    }
}

/// GET /api/appointments/:id - record plus its full status history
pub async fn get_appointment_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Path(id): Path<Uuid>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let appointment = match Appointment::find_by_id(id, &state.db_pool).await {
        Ok(Some(appointment)) => appointment,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Record not found"),
        Err(e) => return internal_failure(e.into()),
    };

    if !actor.can_act_on(appointment.company_id, appointment.department_id) {
        return fail(StatusCode::FORBIDDEN, "Not permitted to view this record");
    }

    let history = match StatusHistoryEntry::find_for_record(
        RecordType::Appointment,
        id,
        &state.db_pool,
    )
    .await
    {
        Ok(history) => history,
        Err(e) => return internal_failure(e),
    };

    ok_json(json!({ "record": appointment, "history": history }))
}

/// POST /api/appointments - intake bridge from the chatbot
pub async fn create_appointment_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Json(body): Json<CreateAppointment>,
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

    let appointment = match Appointment::create(body, &state.db_pool).await {
        Ok(appointment) => appointment,
        Err(e) => return internal_failure(e),
    };

    let entry = NewAuditLog {
        actor_id: Some(*actor.user_id.as_uuid()),
        company_id: Some(appointment.company_id),
        action: AuditAction::Create,
        resource_type: RecordType::Appointment.to_string(),
        resource_id: Some(appointment.id.into_uuid()),
        detail: json!({ "purpose": appointment.purpose, "status": appointment.status }),
        ip_address: actor.ip_address.clone(),
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(appointment_id = %appointment.id, error = %e, "Audit append failed");
    }

    created_json(appointment)
}
