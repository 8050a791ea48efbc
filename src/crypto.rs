use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use password_hash::{PasswordHash, PasswordHasher as ArgonPasswordHasher, SaltString};
use rand::rngs::OsRng;

use crate::{AuthError, SecretString};

/// Number of random characters at the start of an API token.
pub const API_TOKEN_RANDOM_LENGTH: usize = 24;

/// Trait for password hashing and verification.
///
/// ```rust
/// use draconic::SecretString;
/// use draconic::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash(&SecretString::new("hunter22")).unwrap();
/// assert!(hasher.verify(&SecretString::new("hunter22"), &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if hashing fails.
    fn hash(&self, password: &SecretString) -> Result<String, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if the stored hash is malformed.
    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id password hasher with configurable parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    /// Number of iterations
    time_cost: u32,
    /// Degree of parallelism
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB - argon2 default
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &SecretString) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| AuthError::PasswordHashError)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;

        // parameters come from the stored hash
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Random string of `length` characters from `[A-Za-z0-9]`.
pub fn generate_token(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

/// Creates a long-lived API token for upload clients.
///
/// Format: 24 random URL-safe characters, a `.`, then the unpadded base64url
/// encoding of the current Unix time in milliseconds written in decimal.
/// Uniqueness is left to the storage layer.
pub fn create_token() -> String {
    let issued_at = Utc::now().timestamp_millis().to_string();
    format!(
        "{}.{}",
        generate_token(API_TOKEN_RANDOM_LENGTH),
        URL_SAFE_NO_PAD.encode(issued_at)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_length() {
        assert_eq!(generate_token(24).len(), 24);
        assert_eq!(generate_token(64).len(), 64);
    }

    #[test]
    fn test_generate_token_alphanumeric() {
        let token = generate_token(100);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_create_token_shape() {
        let before = Utc::now().timestamp_millis();
        let token = create_token();
        let after = Utc::now().timestamp_millis();

        let (random, stamp) = token.split_once('.').unwrap();
        assert_eq!(random.len(), API_TOKEN_RANDOM_LENGTH);
        assert!(random.chars().all(|c| c.is_ascii_alphanumeric()));

        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(stamp).unwrap()).unwrap();
        let millis: i64 = decoded.parse().unwrap();
        assert!(millis >= before && millis <= after);
    }

    #[test]
    fn test_create_token_is_url_safe() {
        let token = create_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'));
    }

    #[test]
    fn test_create_token_unique() {
        assert_ne!(create_token(), create_token());
    }

    #[test]
    fn test_argon2_round_trip() {
        let hasher = Argon2Hasher::new(8192, 1, 1);
        let hash = hasher.hash(&SecretString::new("correct horse")).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&SecretString::new("correct horse"), &hash).unwrap());
        assert!(!hasher.verify(&SecretString::new("wrong horse"), &hash).unwrap());
    }

    #[test]
    fn test_argon2_malformed_hash() {
        let hasher = Argon2Hasher::default();
        assert_eq!(
            hasher.verify(&SecretString::new("pw"), "not-a-hash"),
            Err(AuthError::PasswordHashError)
        );
    }
}
