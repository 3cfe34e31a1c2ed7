use thiserror::Error;

/// Authorization errors for the Citizen Desk platform
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid or expired verification code")]
    InvalidOtp,

    #[error("No active user for this phone number")]
    UnknownUser,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
