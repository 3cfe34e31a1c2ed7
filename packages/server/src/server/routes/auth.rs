//! Login endpoints: OTP over WhatsApp, JWT issuance, logout.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{fail, internal_failure, ok_json, require_actor, Reply};
use crate::domains::audit::{AuditAction, NewAuditLog};
use crate::domains::auth::OtpCode;
use crate::domains::users::User;
use crate::server::app::AxumAppState;
use crate::server::middleware::{AuthUser, ClientIp};

#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub phone_number: String,
}

/// POST /api/auth/otp/request
pub async fn request_otp_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<RequestOtpRequest>,
) -> Reply {
    // Only phone numbers with an active dashboard user get a code.
    let user = match User::find_active_by_phone(&body.phone_number, &state.db_pool).await {
        Ok(Some(user)) => user,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "No active user for this phone number"),
        Err(e) => return internal_failure(e),
    };

    let otp = match OtpCode::issue(&user.phone_number, state.otp_ttl_minutes, &state.db_pool).await
    {
        Ok(otp) => otp,
        Err(e) => return internal_failure(e),
    };

    if let Err(e) = state
        .deps
        .notifier
        .send_otp_code(&user.phone_number, &otp.code)
        .await
    {
        error!(phone = %user.phone_number, error = %e, "OTP delivery failed");
        return fail(
            StatusCode::BAD_GATEWAY,
            "Could not deliver verification code",
        );
    }

    ok_json(json!({ "expires_at": otp.expires_at }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub code: String,
}

/// POST /api/auth/otp/verify - consume the code, issue a JWT
pub async fn verify_otp_handler(
    Extension(state): Extension<AxumAppState>,
    ip: Option<Extension<ClientIp>>,
    Json(body): Json<VerifyOtpRequest>,
) -> Reply {
    let verified = match OtpCode::verify(&body.phone_number, &body.code, &state.db_pool).await {
        Ok(verified) => verified,
        Err(e) => return internal_failure(e),
    };
    if !verified {
        return fail(
            StatusCode::UNAUTHORIZED,
            "Invalid or expired verification code",
        );
    }

    let user = match User::find_active_by_phone(&body.phone_number, &state.db_pool).await {
        Ok(Some(user)) => user,
        Ok(None) => return fail(StatusCode::NOT_FOUND, "No active user for this phone number"),
        Err(e) => return internal_failure(e),
    };

    let role = match user.role() {
        Ok(role) => role,
        Err(e) => return internal_failure(e),
    };

    let token = match state.deps.jwt_service.create_token(
        user.id.into_uuid(),
        user.phone_number.clone(),
        role,
        user.company_id,
        user.department_id,
    ) {
        Ok(token) => token,
        Err(e) => return internal_failure(e),
    };

    let ip_address = ip.map(|Extension(ClientIp(addr))| addr.to_string());
    let entry = NewAuditLog {
        actor_id: Some(user.id.into_uuid()),
        company_id: user.company_id,
        action: AuditAction::Login,
        resource_type: "session".to_string(),
        resource_id: Some(user.id.into_uuid()),
        detail: json!({}),
        ip_address,
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(user_id = %user.id, error = %e, "Audit append failed");
    }

    ok_json(json!({ "token": token, "user": user }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; logout only records the event for the audit trail.
pub async fn logout_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    ip: Option<Extension<ClientIp>>,
) -> Reply {
    let actor = match require_actor(auth, ip) {
        Ok(actor) => actor,
        Err(reply) => return reply,
    };

    let entry = NewAuditLog {
        actor_id: Some(*actor.user_id.as_uuid()),
        company_id: actor.company_id,
        action: AuditAction::Logout,
        resource_type: "session".to_string(),
        resource_id: Some(*actor.user_id.as_uuid()),
        detail: json!({}),
        ip_address: actor.ip_address.clone(),
    };
    if let Err(e) = state.deps.audit.record(entry).await {
        error!(user_id = %actor.user_id, error = %e, "Audit append failed");
    }

    ok_json(json!({ "logged_out": true }))
}
