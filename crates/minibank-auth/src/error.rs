//! Authentication error types
//!
//! Errors are informative for logging but the authorization middleware never
//! forwards them to clients: every denial looks the same from outside.

use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    // =========================================================================
    // Token Errors
    // =========================================================================
    /// Token is not a well-formed JWT or carries unreadable claims
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the configured key
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was signed with an algorithm other than the configured one
    #[error("Unexpected signing algorithm")]
    UnexpectedAlgorithm,

    /// Token's expiry is in the past
    #[error("Token has expired")]
    TokenExpired,

    /// No token was supplied
    #[error("Missing token")]
    MissingToken,

    // =========================================================================
    // Credential Errors
    // =========================================================================
    /// Unknown account number or wrong password at login
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("Password hashing failed")]
    PasswordHashingFailed,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    /// Token's account does not own the requested resource
    #[error("permission denied")]
    PermissionDenied,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// No signing secret configured
    #[error("Token signing key is not configured")]
    MissingSigningKey,

    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not be exposed to clients)
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Whether the error came from checking a presented token
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::Malformed
                | Self::InvalidSignature
                | Self::UnexpectedAlgorithm
                | Self::TokenExpired
                | Self::MissingToken
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnexpectedAlgorithm
            }
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::Malformed,
        }
    }
}
