//! Company and department administration.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::{created_json, fail, internal_failure, ok_json, require_actor, Reply};
use crate::domains::audit::{AuditAction, NewAuditLog};
use crate::domains::company::{Company, CreateCompany, Department};
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub whatsapp_number: Option<String>,
}

/// POST /api/companies - super admin only
pub async fn create_company_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Json(body): Json<CreateCompanyRequest>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    if !actor.is_super_admin() {
        return fail(
            StatusCode::FORBIDDEN,
            "Only platform administrators may create companies",
        );
    }

    let company = match Company::create(
        CreateCompany {
            name: body.name,
            whatsapp_number: body.whatsapp_number,
        },
        &state.db_pool,
    )
    .await
    {
        Ok(company) => company,
        Err(e) => return internal_failure(e),
    };

    let entry = NewAuditLog {
        actor_id: Some(*actor.user_id.as_uuid()),
        company_id: Some(company.id.into_uuid()),
        action: AuditAction::Create,
        resource_type: "company".to_string(),
        resource_id: Some(company.id.into_uuid()),
        detail: json!({ "name": company.name }),
        ip_address: actor.ip_address.clone(),
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(company_id = %company.id, error = %e, "Audit append failed");
    }

    created_json(company)
}

/// GET /api/companies
pub async fn list_companies_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    if actor.is_super_admin() {
        return match Company::find_all(&state.db_pool).await {
            Ok(companies) => ok_json(companies),
            Err(e) => internal_failure(e),
        };
    }

    // Scoped callers see exactly their own company.
    let Some(company_id) = actor.company_id else {
        return fail(StatusCode::FORBIDDEN, "No company scope on this account");
    };
    match Company::find_by_id(company_id, &state.db_pool).await {
        Ok(Some(company)) => ok_json(vec![company]),
        Ok(None) => fail(StatusCode::NOT_FOUND, "Company not found"),
        Err(e) => internal_failure(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

/// POST /api/companies/:id/departments
pub async fn create_department_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Path(company_id): Path<Uuid>,
    Json(body): Json<CreateDepartmentRequest>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    if !actor.can_manage_company(company_id) {
        return fail(
            StatusCode::FORBIDDEN,
            "Not permitted to manage this company",
        );
    }

    match Company::find_by_id(company_id, &state.db_pool).await {
        Ok(Some(_)) => {}
        Ok(None) => return fail(StatusCode::NOT_FOUND, "Company not found"),
        Err(e) => return internal_failure(e),
    }

    let department = match Department::create(company_id, &body.name, &state.db_pool).await {
        Ok(department) => department,
        Err(e) => return internal_failure(e),
    };

    let entry = NewAuditLog {
        actor_id: Some(*actor.user_id.as_uuid()),
        company_id: Some(company_id),
        action: AuditAction::Create,
        resource_type: "department".to_string(),
        resource_id: Some(department.id.into_uuid()),
        detail: json!({ "name": department.name }),
        ip_address: actor.ip_address.clone(),
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(department_id = %department.id, error = %e, "Audit append failed");
    }

    created_json(department)
}

/// GET /api/companies/:id/departments
pub async fn list_departments_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
    Path(company_id): Path<Uuid>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    // Any member of the company (or a super admin) may browse departments.
    if !actor.is_super_admin() && actor.company_id != Some(company_id) {
        return fail(StatusCode::FORBIDDEN, "Not permitted to view this company");
    }

    match Department::find_for_company(company_id, &state.db_pool).await {
        Ok(departments) => ok_json(departments),
        Err(e) => internal_failure(e),
    }
}
