//! Database models - mapped from PostgreSQL tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Account Models
// ============================================================================

/// A row of the `account` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DbAccount {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Zero-balance account created now
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        number: i64,
        encrypted_password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            number,
            encrypted_password: encrypted_password.into(),
            balance: 0,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Transfer Models
// ============================================================================

/// Balances after an atomic transfer was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub from: i64,
    pub to: i64,
    pub amount: i64,
    pub from_balance: i64,
    pub to_balance: i64,
}
