//! Recent-activity feed for the dashboard.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{fail, internal_failure, ok_json, require_actor, Reply};
use crate::common::ActorRole;
use crate::domains::audit::AuditLog;
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

#[derive(Debug, Deserialize)]
pub struct RecentAuditQuery {
    pub limit: Option<i64>,
}

/// GET /api/audit/recent
pub async fn recent_audit_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Query(query): Query<RecentAuditQuery>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let company_id = match actor.role {
        ActorRole::SuperAdmin => None,
        ActorRole::CompanyAdmin => match actor.company_id {
            Some(company) => Some(company),
            None => return fail(StatusCode::FORBIDDEN, "No company scope on this account"),
        },
        ActorRole::Staff => {
            return fail(
                StatusCode::FORBIDDEN,
                "Activity feed is restricted to administrators",
            )
        }
    };

    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    match AuditLog::find_recent(company_id, limit, &state.db_pool).await {
        Ok(entries) => ok_json(entries),
        Err(e) => internal_failure(e),
    }
}
