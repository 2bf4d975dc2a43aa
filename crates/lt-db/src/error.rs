//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Row rejected before reaching the database
    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Result alias for repository calls
pub type DbResult<T> = Result<T, DbError>;
