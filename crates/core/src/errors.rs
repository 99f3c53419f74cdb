use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid shift time: {0}")]
    ShiftTimeInvalid(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl WatchError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            WatchError::NotFound(_) => "not_found",
            WatchError::Validation(_) => "validation",
            WatchError::ShiftTimeInvalid(_) => "shift_time_invalid",
            WatchError::Conflict(_) => "conflict",
            WatchError::Forbidden(_) => "forbidden",
            WatchError::Authentication(_) => "unauthenticated",
            WatchError::Database(_) | WatchError::Internal(_) => "internal",
        }
    }
}

pub type WatchResult<T> = Result<T, WatchError>;
