//! Status transition endpoint.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{fail, ok_json, require_actor, workflow_failure, Reply};
use crate::domains::appointment::Appointment;
use crate::domains::grievance::Grievance;
use crate::domains::workflow::{transition_status, RecordType};
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub remarks: Option<String>,
}

/// PUT /api/status/:record_type/:id
pub async fn update_status_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Path((record_type, id)): Path<(String, Uuid)>,
    Json(body): Json<UpdateStatusRequest>,
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
            match transition_status::<Grievance>(id, &body.status, body.remarks, &actor, &state.deps)
                .await
            {
                Ok(updated) => ok_json(updated),
                Err(e) => workflow_failure(e),
            }
        }
        RecordType::Appointment => {
            match transition_status::<Appointment>(
                id,
                &body.status,
                body.remarks,
                &actor,
                &state.deps,
            )
            .await
            {
                Ok(updated) => ok_json(updated),
                Err(e) => workflow_failure(e),
            }
        }
    }
}
