// HTTP routes
pub mod appointments;
pub mod assignments;
pub mod audit;
pub mod auth;
pub mod companies;
pub mod grievances;
pub mod health;
pub mod status;
pub mod users;

pub use appointments::*;
pub use assignments::*;
pub use audit::*;
pub use auth::*;
pub use companies::*;
pub use grievances::*;
pub use health::*;
pub use status::*;
pub use users::*;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::common::{ActorContext, ApiResponse};
use crate::domains::workflow::WorkflowError;
use crate::server::middleware::{AuthUser, ClientIp};

/// Every handler answers the same envelope shape.
pub type Reply = (StatusCode, Json<ApiResponse<Value>>);

pub(crate) fn ok_json<T: Serialize>(data: T) -> Reply {
    json_with_status(StatusCode::OK, data)
}

pub(crate) fn created_json<T: Serialize>(data: T) -> Reply {
    json_with_status(StatusCode::CREATED, data)
}

fn json_with_status<T: Serialize>(status: StatusCode, data: T) -> Reply {
    match serde_json::to_value(data) {
        Ok(value) => (status, Json(ApiResponse::ok(value))),
        Err(e) => {
            error!(error = %e, "Failed to serialize response payload");
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub(crate) fn fail(status: StatusCode, message: impl Into<String>) -> Reply {
    (status, Json(ApiResponse::error(message)))
}

/// Map engine failures onto the error envelope.
pub(crate) fn workflow_failure(e: WorkflowError) -> Reply {
    let status = match &e {
        WorkflowError::RecordNotFound | WorkflowError::UserNotFound => StatusCode::NOT_FOUND,
        WorkflowError::InvalidStatus(_) | WorkflowError::OutOfScopeAssignee => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        WorkflowError::NoOpTransition(_) | WorkflowError::Conflict => StatusCode::CONFLICT,
        WorkflowError::Forbidden => StatusCode::FORBIDDEN,
        WorkflowError::Database(_) | WorkflowError::Internal(_) => {
            error!(error = %e, "Workflow engine failed");
            return fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };
    fail(status, e.to_string())
}

/// Map infrastructure failures onto a generic 500.
pub(crate) fn internal_failure(e: anyhow::Error) -> Reply {
    error!(error = %e, "Request failed");
    fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Listing parameters shared by the record collections.
#[derive(Debug, serde::Deserialize)]
pub struct RecordListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl RecordListQuery {
    pub(crate) fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    pub(crate) fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Build the actor context, or the 401 reply when unauthenticated.
pub(crate) fn require_actor(
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
) -> Result<ActorContext, Reply> {
    let Some(Extension(user)) = auth else {
        return Err(fail(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
        ));
    };
    let ip_address = ip.map(|Extension(ClientIp(addr))| addr.to_string());
    Ok(user.to_actor(ip_address))
}
