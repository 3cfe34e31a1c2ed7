use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::record::RecordType;

/// Status history model - append-only, shared by both record variants
///
/// Rows are only ever inserted; `created_at` comes from the database so
/// entries for one record are chronologically ordered.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub record_type: String,
    pub record_id: Uuid,
    pub status: String,
    pub remarks: Option<String>,
    pub actor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl StatusHistoryEntry {
    /// Append an entry inside the caller's transaction.
    pub async fn append(
        record_type: RecordType,
        record_id: Uuid,
        status: &str,
        remarks: Option<&str>,
        actor_id: Option<Uuid>,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO status_history (record_type, record_id, status, remarks, actor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(record_type.to_string())
        .bind(record_id)
        .bind(status)
        .bind(remarks)
        .bind(actor_id)
        .fetch_one(&mut *conn)
        .await
    }

    /// Full history of one record, oldest first.
    pub async fn find_for_record(
        record_type: RecordType,
        record_id: Uuid,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM status_history
            WHERE record_type = $1 AND record_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(record_type.to_string())
        .bind(record_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
