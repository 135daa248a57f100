//! Password Service
//!
//! Password hashing using Argon2id (OWASP recommended):
//! - per-call random salt, configurable cost
//! - optional pepper
//! - verification never errors; anything but a match is `false`

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::config::PasswordConfig;
use crate::error::{AuthError, AuthResult};

/// Password service for hashing and verification
#[derive(Debug, Clone)]
pub struct PasswordService {
    config: PasswordConfig,
}

impl PasswordService {
    /// Create a new password service
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        self.validate_password_length(password)?;

        let peppered = self.peppered(password);
        let salt = SaltString::generate(&mut OsRng);

        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.hash_length as usize),
        )
        .map_err(|e| AuthError::Internal(format!("Invalid Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHashingFailed)?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `false` on mismatch, on an empty password and on a stored
    /// hash that cannot be parsed.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        if password.is_empty() {
            return false;
        }

        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is unreadable");
                return false;
            }
        };

        // Cost parameters are read back from the hash itself
        let peppered = self.peppered(password);
        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Check the password length bounds
    pub fn validate_password_length(&self, password: &str) -> AuthResult<()> {
        let length = password.chars().count();

        if length < self.config.min_password_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        if length > self.config.max_password_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at most {} characters",
                self.config.max_password_length
            )));
        }

        Ok(())
    }

    fn peppered(&self, password: &str) -> Zeroizing<String> {
        match self.config.pepper {
            Some(ref pepper) => Zeroizing::new(format!("{}{}", password, pepper)),
            None => Zeroizing::new(password.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PasswordConfig {
        PasswordConfig {
            // Use lower values for tests to be fast
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            min_password_length: 8,
            max_password_length: 128,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new(test_config());
        let password = "correct horse battery";

        let hash = service.hash_password(password).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(service.verify_password(password, &hash));
        assert!(!service.verify_password("wrongpassword", &hash));
    }

    #[test]
    fn test_verify_rejects_empty_and_hash_itself() {
        let service = PasswordService::new(test_config());
        let hash = service.hash_password("correct horse battery").unwrap();

        assert!(!service.verify_password("", &hash));
        assert!(!service.verify_password(&hash, &hash));
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        let service = PasswordService::new(test_config());
        assert!(!service.verify_password("correct horse battery", "not-a-hash"));
        assert!(!service.verify_password("correct horse battery", ""));
    }

    #[test]
    fn test_hash_with_pepper() {
        let mut config = test_config();
        config.pepper = Some("secret-pepper".to_string());
        let service = PasswordService::new(config);

        let password = "correct horse battery";
        let hash = service.hash_password(password).unwrap();
        assert!(service.verify_password(password, &hash));

        let service_no_pepper = PasswordService::new(test_config());
        assert!(!service_no_pepper.verify_password(password, &hash));
    }

    #[test]
    fn test_length_bounds() {
        let service = PasswordService::new(test_config());

        assert!(matches!(service.hash_password("short"), Err(AuthError::WeakPassword(_))));
        assert!(matches!(
            service.hash_password(&"x".repeat(129)),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(service.validate_password_length("exactly8").is_ok());
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let service = PasswordService::new(test_config());
        let password = "correct horse battery";

        let hash1 = service.hash_password(password).unwrap();
        let hash2 = service.hash_password(password).unwrap();

        // Same password should produce different hashes (different salts)
        assert_ne!(hash1, hash2);
        assert!(service.verify_password(password, &hash1));
        assert!(service.verify_password(password, &hash2));
    }

    #[test]
    fn test_invalid_params_surface_as_error() {
        let mut config = test_config();
        config.memory_cost = 1;
        let service = PasswordService::new(config);

        assert!(service.hash_password("correct horse battery").is_err());
    }
}
