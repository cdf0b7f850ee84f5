#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input or business-rule violation. Reported to the caller,
    /// never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A state-machine precondition was violated (e.g. accepting a
    /// booking that is no longer pending).
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A concurrent mutation won the race.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence failure during a primary write or audit append.
    #[error("database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(format!("{err:#}"))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
