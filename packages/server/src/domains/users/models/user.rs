use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{ActorRole, UserId};

/// Dashboard user model - SQL persistence layer
///
/// Users belong to a company (except super admins) and optionally to a
/// department. Only active users appear in assignment pools.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone_number: String,
    pub role: String,
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub phone_number: String,
    pub role: ActorRole,
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

impl User {
    /// Parse the stored role text.
    pub fn role(&self) -> Result<ActorRole> {
        self.role.parse()
    }

    /// Find user by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find the active user behind a login phone number
    pub async fn find_active_by_phone(phone_number: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users WHERE phone_number = $1 AND active = true",
        )
        .bind(phone_number)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new user
    pub async fn create(input: CreateUser, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (name, phone_number, role, company_id, department_id, active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone_number)
        .bind(input.role.to_string())
        .bind(input.company_id)
        .bind(input.department_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Assignment pool: active users of a company.
    ///
    /// When a department is given, plain staff must belong to it; company
    /// admins stay eligible for every department of their company.
    pub async fn find_available(
        company_id: Uuid,
        department_id: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM users
            WHERE active = true
              AND company_id = $1
              AND ($2::uuid IS NULL OR department_id = $2 OR role = 'company_admin')
            ORDER BY name ASC
            "#,
        )
        .bind(company_id)
        .bind(department_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// List users, optionally limited to one company
    pub async fn find_with_filters(company_id: Option<Uuid>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM users
            WHERE ($1::uuid IS NULL OR company_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Activate or deactivate a user
    pub async fn update_active(id: Uuid, active: bool, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE users SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_from_stored_text() {
        let user = User {
            id: UserId::new(),
            name: "Asha".to_string(),
            phone_number: "+919876543210".to_string(),
            role: "company_admin".to_string(),
            company_id: Some(Uuid::new_v4()),
            department_id: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(user.role().unwrap(), ActorRole::CompanyAdmin);
    }
}
