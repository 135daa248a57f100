//! Authentication configuration
//!
//! Configuration for token signing and password hashing with secure defaults.
//! The signing secret has no usable default: it must be injected.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens (should be at least 256 bits)
    pub secret: String,
    /// How long an issued token stays valid
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
    /// HMAC algorithm to sign and accept (HS256, HS384, HS512)
    pub algorithm: String,
    /// Clock skew tolerated when checking expiry, in seconds
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set
            token_lifetime: Duration::from_secs(15 * 60),
            algorithm: "HS256".to_string(),
            leeway_secs: 30,
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KiB (OWASP recommends 19456 KiB = 19 MiB minimum)
    pub memory_cost: u32,
    /// Time cost (iterations) - OWASP recommends 2 minimum
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
    /// Pepper (additional secret, optional)
    pub pepper: Option<String>,
    /// Minimum password length
    pub min_password_length: usize,
    /// Maximum password length (to prevent DoS)
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            min_password_length: 8,
            max_password_length: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_is_empty() {
        let config = AuthConfig::default();
        assert!(config.jwt.secret.is_empty());
        assert_eq!(config.jwt.algorithm, "HS256");
    }

    #[test]
    fn test_lifetime_uses_humantime() {
        let json = r#"{"secret":"s","token_lifetime":"1h 30m","algorithm":"HS512","leeway_secs":0}"#;
        let config: JwtConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(90 * 60));
    }
}
