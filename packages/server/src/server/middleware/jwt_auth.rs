use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::common::{ActorContext, ActorRole};
use crate::domains::auth::JwtService;

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub phone_number: String,
    pub role: ActorRole,
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

impl AuthUser {
    /// Actor context for engine calls, with the request IP attached.
    pub fn to_actor(&self, ip_address: Option<String>) -> ActorContext {
        ActorContext {
            user_id: self.user_id.into(),
            role: self.role,
            company_id: self.company_id,
            department_id: self.department_id,
            ip_address,
        }
    }
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds
/// AuthUser to request extensions. If no token or invalid token, request
/// continues without AuthUser (public access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!(
            "Authenticated user: {} (role: {})",
            user.user_id, user.role
        );
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        phone_number: claims.phone_number,
        role: claims.role,
        company_id: claims.company_id,
        department_id: claims.department_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(jwt_service: &JwtService, role: ActorRole, company: Option<Uuid>) -> String {
        jwt_service
            .create_token(
                Uuid::new_v4(),
                "+919812345678".to_string(),
                role,
                company,
                None,
            )
            .unwrap()
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let company = Uuid::new_v4();
        let token = token_for(&jwt_service, ActorRole::CompanyAdmin, Some(company));

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.role, ActorRole::CompanyAdmin);
        assert_eq!(auth_user.company_id, Some(company));
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let token = token_for(&jwt_service, ActorRole::Staff, Some(Uuid::new_v4()));

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt_service).is_some());
    }

    #[test]
    fn test_no_auth_header() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt_service).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt_service).is_none());
    }
}
