//! Database error types

use thiserror::Error;

/// Account store errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: i64, required: i64 },
}

impl DbError {
    /// Not-found error for an account looked up by public number
    pub fn account_number(number: i64) -> Self {
        DbError::NotFound(format!("account with number [{}]", number))
    }

    /// Not-found error for an account looked up by internal id
    pub fn account_id(id: i32) -> Self {
        DbError::NotFound(format!("account {}", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
