//! Core authentication types

use serde::{Deserialize, Serialize};

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Public number of the account the token was issued to
    pub account_number: i64,
    /// Expiry (Unix timestamp, seconds)
    pub expires_at: i64,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Unique token ID
    pub jti: String,
}

/// Account admitted by the authorization middleware.
///
/// Inserted into request extensions; handlers read it through
/// [`RequireAccount`](crate::middleware::RequireAccount).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    /// Internal store id
    pub account_id: i32,
    /// Public account number (equal to the token claim)
    pub account_number: i64,
}

/// JSON error body shared by every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
