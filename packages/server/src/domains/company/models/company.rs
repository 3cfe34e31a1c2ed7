use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::CompanyId;

/// Company model - a tenant on the platform
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Chatbot sender number citizens talk to.
    pub whatsapp_number: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a company
#[derive(Debug, Clone)]
pub struct CreateCompany {
    pub name: String,
    pub whatsapp_number: Option<String>,
}

impl Company {
    /// Find company by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// List all companies, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM companies ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new company
    pub async fn create(input: CreateCompany, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO companies (name, whatsapp_number, active)
            VALUES ($1, $2, true)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.whatsapp_number)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
