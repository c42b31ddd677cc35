use serde::Serialize;
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Failed to {operation}: {reason}")]
    DependencyFailure { operation: &'static str, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error classification handed to the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    Validation,
    DependencyFailure,
    Internal,
}

impl AppError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::InvalidState(_) => ErrorKind::InvalidState,
            AppError::InvalidInput { .. } => ErrorKind::Validation,
            AppError::DependencyFailure { .. } => ErrorKind::DependencyFailure,
            AppError::Database(_) | AppError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Check if a rusqlite error is a UNIQUE constraint violation
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _)
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
}

/// Check if a rusqlite error is a FOREIGN KEY constraint violation
pub fn is_fk_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _)
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

/// Map a UNIQUE violation to a Conflict carrying `message`, pass anything else through.
pub fn conflict_on_unique(e: rusqlite::Error, message: impl FnOnce() -> String) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(message())
    } else {
        AppError::Database(e)
    }
}

/// Map a FOREIGN KEY violation to a Conflict carrying `message`, pass anything else through.
pub fn conflict_on_fk(e: rusqlite::Error, message: impl FnOnce() -> String) -> AppError {
    if is_fk_violation(&e) {
        AppError::Conflict(message())
    } else {
        AppError::Database(e)
    }
}
