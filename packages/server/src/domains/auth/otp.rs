//! One-time login codes, delivered over WhatsApp.
//!
//! Codes are single-use and short-lived. Verification consumes the row
//! atomically so a replayed code can never log in twice.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// OTP code model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct OtpCode {
    pub id: Uuid,
    pub phone_number: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    /// Generate a 6-digit code.
    pub fn generate_code() -> String {
        let n = Uuid::new_v4().as_u128() % 1_000_000;
        format!("{:06}", n)
    }

    /// Issue a fresh code for a phone number.
    ///
    /// Outstanding codes for the same number are consumed so only the most
    /// recent one can verify.
    pub async fn issue(phone_number: &str, ttl_minutes: i64, pool: &PgPool) -> Result<Self> {
        let code = Self::generate_code();
        let expires_at = Utc::now() + Duration::minutes(ttl_minutes);

        sqlx::query("UPDATE otp_codes SET consumed = true WHERE phone_number = $1 AND NOT consumed")
            .bind(phone_number)
            .execute(pool)
            .await?;

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO otp_codes (phone_number, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(phone_number)
        .bind(&code)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Verify and consume a code. Returns `true` when a live, unconsumed
    /// code matched.
    pub async fn verify(phone_number: &str, code: &str, pool: &PgPool) -> Result<bool> {
        let consumed = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE otp_codes
            SET consumed = true
            WHERE phone_number = $1
              AND code = $2
              AND NOT consumed
              AND expires_at > NOW()
            RETURNING id
            "#,
        )
        .bind(phone_number)
        .bind(code)
        .fetch_optional(pool)
        .await?;

        Ok(consumed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = OtpCode::generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
