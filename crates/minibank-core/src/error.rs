//! Error types for minibank core operations
//!
//! Business-rule violations are distinct variants so the API layer can tell
//! a refused transfer from a failing store.

use minibank_db::DbError;
use thiserror::Error;

/// Core errors that can occur during banking operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("amount must be positive, got {amount}")]
    InvalidAmount { amount: i64 },

    #[error("cannot transfer to the same account")]
    SameAccount,

    #[error("account with number [{number}] not found")]
    AccountNotFound { number: i64 },

    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: i64, required: i64 },

    #[error("could not allocate a free account number after {attempts} attempts")]
    NumberSpaceExhausted { attempts: u32 },

    #[error("store error: {0}")]
    Store(#[from] DbError),
}

impl CoreError {
    /// Whether the operation was refused by a banking rule rather than failed
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. } | Self::SameAccount | Self::InsufficientFunds { .. }
        )
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
