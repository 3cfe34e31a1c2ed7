use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub whatsapp_access_token: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_api_base: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub otp_ttl_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            whatsapp_access_token: env::var("WHATSAPP_ACCESS_TOKEN")
                .context("WHATSAPP_ACCESS_TOKEN must be set")?,
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID")
                .context("WHATSAPP_PHONE_NUMBER_ID must be set")?,
            whatsapp_api_base: env::var("WHATSAPP_API_BASE").ok(),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "citizen-desk".to_string()),
            otp_ttl_minutes: env::var("OTP_TTL_MINUTES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("OTP_TTL_MINUTES must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; a single test avoids races under the
    // parallel test runner.
    #[test]
    fn loads_from_env_with_defaults() {
        env::set_var("DATABASE_URL", "postgres://localhost/citizen_desk_test");
        env::set_var("WHATSAPP_ACCESS_TOKEN", "token");
        env::set_var("WHATSAPP_PHONE_NUMBER_ID", "12345");
        env::set_var("JWT_SECRET", "secret");
        env::remove_var("PORT");
        env::remove_var("JWT_ISSUER");
        env::remove_var("OTP_TTL_MINUTES");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_issuer, "citizen-desk");
        assert_eq!(config.otp_ttl_minutes, 5);
    }
}
