//! minibank Authentication Layer
//!
//! - **Session tokens**: HMAC-signed JWTs naming the account they were issued to
//! - **Password security**: Argon2id hashing with optional pepper
//! - **Account authorization**: tower middleware admitting a request only when
//!   the token's account owns the addressed resource
//!
//! ```text
//! Request → AccountOwnerLayer → Handler
//!               │
//!               ├─ x-jwt-token ─→ JwtService::validate_token
//!               ├─ :number / claim ─→ AccountStore::get_account_by_number
//!               └─ number == claim ─→ AuthenticatedAccount (extension)
//! ```

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod types;

pub use config::{AuthConfig, JwtConfig, PasswordConfig};
pub use error::{AuthError, AuthResult};
pub use jwt::JwtService;
pub use middleware::{AccountOwnerLayer, AccountOwnerMiddleware, RequireAccount, TOKEN_HEADER};
pub use password::PasswordService;
pub use types::*;

use minibank_db::AccountStore;
use std::sync::Arc;

/// Authentication services bundled for the API layer
#[derive(Debug, Clone)]
pub struct AuthService {
    pub jwt: Arc<JwtService>,
    pub password: PasswordService,
}

impl AuthService {
    /// Create the auth service. Fails without a signing secret.
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        let jwt = Arc::new(JwtService::new(config.jwt.clone())?);
        let password = PasswordService::new(config.password);

        Ok(Self { jwt, password })
    }

    /// Create the account authorization layer for an Axum router
    pub fn layer(&self, store: Arc<dyn AccountStore>) -> AccountOwnerLayer {
        AccountOwnerLayer::new(self.jwt.clone(), store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_service_requires_secret() {
        assert!(matches!(
            AuthService::new(AuthConfig::default()),
            Err(AuthError::MissingSigningKey)
        ));
    }

    #[test]
    fn test_auth_service_creation() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "lib-test-secret-at-least-32-bytes-long".to_string();

        let service = AuthService::new(config).unwrap();
        let token = service.jwt.issue_token(42).unwrap();
        assert_eq!(service.jwt.validate_token(&token).unwrap().account_number, 42);
    }
}
