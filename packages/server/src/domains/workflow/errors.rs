use thiserror::Error;

/// Caller-visible failures of the status-transition and assignment engines.
///
/// Every variant maps to a per-request outcome; nothing here is fatal to the
/// process. The HTTP layer owns the status-code mapping.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Record not found")]
    RecordNotFound,

    #[error("User not found or inactive")]
    UserNotFound,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Record is already in status \"{0}\"")]
    NoOpTransition(String),

    #[error("Assignee is outside the record's company or department")]
    OutOfScopeAssignee,

    #[error("Not permitted to modify this record")]
    Forbidden,

    #[error("Record was modified concurrently, please retry")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
