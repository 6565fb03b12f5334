//! Unified error types for the expense tracker.
//!
//! Every failure the core can produce maps onto one variant here, and each
//! variant carries enough structure for the response layer to pick a status
//! code without string matching.

use crate::validation::ValidationFailure;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// One or more field-level input violations
    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    /// A referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"User"`
        entity: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// A uniqueness constraint would be violated
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable conflict description
        message: String,
    },

    /// Mutation attempted on an immutable record
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Reason the operation was refused
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Unexpected failure outside the database driver, e.g. password hashing
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },

    /// Database driver or query failure
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        // Unique indexes are the last line against racing writers.
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return Self::Conflict { message: detail };
        }
        Self::Database(err)
    }
}

impl From<ValidationFailure> for Error {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] value.
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// HTTP status code a transport boundary should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Forbidden { .. } => 403,
            Self::Config { .. }
            | Self::Internal { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::EnvVar(_) => 500,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
