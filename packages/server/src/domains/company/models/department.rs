use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::DepartmentId;

/// Department model - a unit within a company
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Department {
    pub id: DepartmentId,
    pub company_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Department {
    /// Find department by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// List departments of a company
    pub async fn find_for_company(company_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM departments WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new department
    pub async fn create(company_id: Uuid, name: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO departments (company_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
