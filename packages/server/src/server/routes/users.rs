//! User administration.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::{created_json, fail, internal_failure, ok_json, require_actor, Reply};
use crate::common::ActorRole;
use crate::domains::audit::{AuditAction, NewAuditLog};
use crate::domains::users::{CreateUser, User};
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub phone_number: String,
    pub role: ActorRole,
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

/// POST /api/users
///
/// Company admins create staff and admins for their own company; super
/// admins create anyone anywhere.
pub async fn create_user_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Json(body): Json<CreateUserRequest>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let input = match actor.role {
        ActorRole::SuperAdmin => CreateUser {
            name: body.name,
            phone_number: body.phone_number,
            role: body.role,
            company_id: body.company_id,
            department_id: body.department_id,
        },
        ActorRole::CompanyAdmin => {
            if body.role == ActorRole::SuperAdmin {
                return fail(
                    StatusCode::FORBIDDEN,
                    "Company administrators cannot create platform administrators",
                );
            }
            let Some(own_company) = actor.company_id else {
                return fail(StatusCode::FORBIDDEN, "No company scope on this account");
            };
            if body.company_id.is_some() && body.company_id != Some(own_company) {
                return fail(
                    StatusCode::FORBIDDEN,
                    "Not permitted to create users for another company",
                );
            }
            CreateUser {
                name: body.name,
                phone_number: body.phone_number,
                role: body.role,
                company_id: Some(own_company),
                department_id: body.department_id,
            }
        }
        ActorRole::Staff => {
            return fail(StatusCode::FORBIDDEN, "Not permitted to create users")
        }
    };

    // Everyone below super admin belongs to a company.
    if input.role != ActorRole::SuperAdmin && input.company_id.is_none() {
        return fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "company_id is required for this role",
        );
    }

    let user = match User::create(input, &state.db_pool).await {
        Ok(user) => user,
        Err(e) => return internal_failure(e),
    };

    let entry = NewAuditLog {
        actor_id: Some(*actor.user_id.as_uuid()),
        company_id: user.company_id,
        action: AuditAction::Create,
        resource_type: "user".to_string(),
        resource_id: Some(user.id.into_uuid()),
        detail: json!({ "name": user.name, "role": user.role }),
        ip_address: actor.ip_address.clone(),
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(user_id = %user.id, error = %e, "Audit append failed");
    }

    created_json(user)
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub company_id: Option<Uuid>,
}

/// GET /api/users
pub async fn list_users_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Query(query): Query<ListUsersQuery>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let company_id = match actor.role {
        ActorRole::SuperAdmin => query.company_id,
        ActorRole::CompanyAdmin => match actor.company_id {
            Some(company) => Some(company),
            None => return fail(StatusCode::FORBIDDEN, "No company scope on this account"),
        },
        ActorRole::Staff => {
            return fail(
                StatusCode::FORBIDDEN,
                "User administration is restricted to administrators",
            )
        }
    };

    match User::find_with_filters(company_id, &state.db_pool).await {
        Ok(users) => ok_json(users),
        Err(e) => internal_failure(e),
    }
}
