use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{ActorContext, ActorRole};

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,                  // Subject (user_id as string)
    pub user_id: Uuid,                // User UUID
    pub phone_number: String,         // Phone number (for logging/debugging)
    pub role: ActorRole,              // Dashboard role
    pub company_id: Option<Uuid>,     // Company scope (None for super admins)
    pub department_id: Option<Uuid>,  // Department scope (staff only)
    pub exp: i64,                     // Expiration timestamp
    pub iat: i64,                     // Issued at timestamp
    pub iss: String,                  // Issuer
    pub jti: String,                  // JWT ID (unique token identifier)
}

impl Claims {
    /// Build the actor context engines receive, attaching the request IP.
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

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a new JWT token for a dashboard user
    ///
    /// Token expires after 24 hours
    pub fn create_token(
        &self,
        user_id: Uuid,
        phone_number: String,
        role: ActorRole,
        company_id: Option<Uuid>,
        department_id: Option<Uuid>,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            phone_number,
            role,
            company_id,
            department_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();

        let token = service
            .create_token(
                user_id,
                "+1234567890".to_string(),
                ActorRole::CompanyAdmin,
                Some(company_id),
                None,
            )
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.phone_number, "+1234567890");
        assert_eq!(claims.role, ActorRole::CompanyAdmin);
        assert_eq!(claims.company_id, Some(company_id));
        assert_eq!(claims.department_id, None);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_claims_to_actor_carries_scope() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let department_id = Uuid::new_v4();

        let token = service
            .create_token(
                user_id,
                "+1234567890".to_string(),
                ActorRole::Staff,
                Some(company_id),
                Some(department_id),
            )
            .unwrap();
        let claims = service.verify_token(&token).unwrap();
        let actor = claims.to_actor(Some("10.0.0.1".to_string()));

        assert_eq!(*actor.user_id.as_uuid(), user_id);
        assert_eq!(actor.company_id, Some(company_id));
        assert_eq!(actor.department_id, Some(department_id));
        assert_eq!(actor.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let result = service.verify_token("invalid_token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new("secret_a", "issuer".to_string());
        let other = JwtService::new("secret_b", "issuer".to_string());

        let token = other
            .create_token(
                Uuid::new_v4(),
                "+1234567890".to_string(),
                ActorRole::Staff,
                None,
                None,
            )
            .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let service = JwtService::new("secret", "issuer_a".to_string());
        let other = JwtService::new("secret", "issuer_b".to_string());

        let token = other
            .create_token(
                Uuid::new_v4(),
                "+1234567890".to_string(),
                ActorRole::Staff,
                None,
                None,
            )
            .unwrap();

        assert!(service.verify_token(&token).is_err());
    }
}
