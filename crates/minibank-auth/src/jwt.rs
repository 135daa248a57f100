//! JWT Token Service
//!
//! Stateless session tokens:
//! - HMAC-signed with a secret injected at construction
//! - Only the configured algorithm is accepted (no algorithm confusion)
//! - Expiry enforced on every validation

use std::str::FromStr;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::TokenClaims;

/// JWT service for token management
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &self.algorithm)
            .field("token_lifetime", &self.config.token_lifetime)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Create a new JWT service.
    ///
    /// Fails when the secret is empty or the algorithm is not HMAC.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::MissingSigningKey);
        }

        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| AuthError::Config(format!("Unknown JWT algorithm {}", config.algorithm)))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Config(format!(
                "JWT algorithm {} is not an HMAC algorithm",
                config.algorithm
            )));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            algorithm,
            encoding_key,
            decoding_key,
        })
    }

    /// Issue a signed token for an account
    pub fn issue_token(&self, account_number: i64) -> AuthResult<String> {
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(self.config.token_lifetime)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let claims = TokenClaims {
            account_number,
            expires_at: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))
    }

    /// Verify signature, algorithm and expiry, and return the claims
    pub fn validate_token(&self, token: &str) -> AuthResult<TokenClaims> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let mut validation = Validation::new(self.algorithm);
        // Expiry lives in `expiresAt`, checked below
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)?.claims;

        let leeway = i64::try_from(self.config.leeway_secs).unwrap_or(i64::MAX);
        if claims.expires_at < Utc::now().timestamp().saturating_sub(leeway) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Configured signing algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}
