//! In-memory record implementation for engine unit tests.
//!
//! Backed by a process-global map keyed by record ID, so tests exercise the
//! engines' validation and CAS paths without a database. The pool argument
//! is ignored; tests pass a lazy pool that never connects.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

use super::record::{RecordType, WorkflowRecord};
use crate::domains::grievance::GrievanceStatus;

#[derive(Debug, Clone)]
pub struct TestRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub department_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub citizen_contact: String,
    pub status: String,
    pub version: i64,
}

impl TestRecord {
    pub fn pending(company_id: Uuid, department_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            department_id,
            assigned_to: None,
            citizen_contact: "+919876543210".to_string(),
            status: "pending".to_string(),
            version: 0,
        }
    }

    pub fn store(self) -> Uuid {
        let id = self.id;
        records().lock().unwrap().insert(id, self);
        id
    }

    pub fn fetch(id: Uuid) -> Option<Self> {
        records().lock().unwrap().get(&id).cloned()
    }
}

fn records() -> &'static Mutex<HashMap<Uuid, TestRecord>> {
    static STORE: OnceLock<Mutex<HashMap<Uuid, TestRecord>>> = OnceLock::new();
    STORE.get_or_init(|| Mutex::new(HashMap::new()))
}

#[async_trait]
impl WorkflowRecord for TestRecord {
    type Status = GrievanceStatus;

    const RECORD_TYPE: RecordType = RecordType::Grievance;

    fn record_uuid(&self) -> Uuid {
        self.id
    }

    fn company_uuid(&self) -> Uuid {
        self.company_id
    }

    fn department_uuid(&self) -> Option<Uuid> {
        self.department_id
    }

    fn assignee_uuid(&self) -> Option<Uuid> {
        self.assigned_to
    }

    fn citizen_contact(&self) -> &str {
        &self.citizen_contact
    }

    fn status_text(&self) -> &str {
        &self.status
    }

    fn record_version(&self) -> i64 {
        self.version
    }

    async fn find_by_id(id: Uuid, _pool: &PgPool) -> sqlx::Result<Option<Self>> {
        Ok(Self::fetch(id))
    }

    async fn persist_status(
        id: Uuid,
        expected_version: i64,
        status: Self::Status,
        _conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        use super::record::RecordStatus;

        let mut store = records().lock().unwrap();
        match store.get_mut(&id) {
            Some(record) if record.version == expected_version => {
                record.status = status.as_str().to_string();
                record.version += 1;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn persist_assignee(
        id: Uuid,
        expected_version: i64,
        assignee: Uuid,
        _pool: &PgPool,
    ) -> sqlx::Result<Option<Self>> {
        let mut store = records().lock().unwrap();
        match store.get_mut(&id) {
            Some(record) if record.version == expected_version => {
                record.assigned_to = Some(assignee);
                record.version += 1;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }
}
