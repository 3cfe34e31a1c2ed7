//! Assignment endpoints: assign a record, list the scoped assignee pool.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{fail, internal_failure, ok_json, require_actor, workflow_failure, Reply};
use crate::common::ActorRole;
use crate::domains::appointment::Appointment;
use crate::domains::grievance::Grievance;
use crate::domains::users::User;
use crate::domains::workflow::{assign, RecordType};
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assigned_to: Uuid,
}

/// PUT /api/assignments/:record_type/:id/assign
pub async fn assign_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Path((record_type, id)): Path<(String, Uuid)>,
    Json(body): Json<AssignRequest>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let record_type: RecordType = match record_type.parse() {
        Ok(t) => t,
        Err(_) => return fail(StatusCode::NOT_FOUND, "Unknown record type"),
    };

    match record_type {
        RecordType::Grievance => {
            match assign::<Grievance>(id, body.assigned_to, &actor, &state.deps).await {
                Ok(updated) => ok_json(updated),
                Err(e) => workflow_failure(e),
            }
        }
        RecordType::Appointment => {
            match assign::<Appointment>(id, body.assigned_to, &actor, &state.deps).await {
                Ok(updated) => ok_json(updated),
                Err(e) => workflow_failure(e),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailableUsersQuery {
    /// Super admins pick the company; scoped callers are pinned to their own.
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

/// GET /api/assignments/users/available
///
/// The candidate pool the dashboard offers in its assignee picker, already
/// filtered to the caller's company (and department for staff callers).
pub async fn available_users_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Query(query): Query<AvailableUsersQuery>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let (company_id, department_id) = match actor.role {
        ActorRole::SuperAdmin => match query.company_id {
            Some(company) => (company, query.department_id),
            None => {
                return fail(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "company_id is required for platform administrators",
                )
            }
        },
        ActorRole::CompanyAdmin => match actor.company_id {
            Some(company) => (company, query.department_id),
            None => return fail(StatusCode::FORBIDDEN, "No company scope on this account"),
        },
        ActorRole::Staff => match actor.company_id {
            Some(company) => (company, actor.department_id),
            None => return fail(StatusCode::FORBIDDEN, "No company scope on this account"),
        },
    };

    match User::find_available(company_id, department_id, &state.db_pool).await {
        Ok(users) => ok_json(users),
        Err(e) => internal_failure(e),
    }
}
