use chrono::Duration;
use serde::Deserialize;

use crate::SecretString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    None,
    #[default]
    Lax,
    Strict,
}

/// Settings for the `user` session cookie.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_path: String,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
    /// `Lax` keeps cross-site POSTs from carrying the session.
    pub cookie_same_site: SameSite,
    /// Lifetime granted at login.
    pub session_lifetime: Duration,
    pub secret_key: SecretString,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "user".to_owned(),
            cookie_path: "/".to_owned(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_http_only: true,
            cookie_same_site: SameSite::Lax,
            session_lifetime: Duration::days(7),
            secret_key: SecretString::new(""),
        }
    }
}

impl SessionConfig {
    pub fn with_secret(secret_key: impl Into<SecretString>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.secret_key.is_empty() {
            return Err("secret_key must not be empty");
        }
        if self.secret_key.len() < 32 {
            return Err("secret_key should be at least 32 bytes");
        }
        if self.cookie_name.is_empty() {
            return Err("cookie_name must not be empty");
        }
        if self.session_lifetime <= Duration::zero() {
            return Err("session_lifetime must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "user");
        assert_eq!(config.cookie_path, "/");
        assert!(config.cookie_http_only);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert_eq!(config.session_lifetime, Duration::days(7));
    }

    #[test]
    fn test_validate_empty_secret() {
        assert!(SessionConfig::default().validate().is_err());
    }

    #[test]
    fn test_validate_short_secret() {
        assert!(SessionConfig::with_secret("short").validate().is_err());
    }

    #[test]
    fn test_validate_non_positive_lifetime() {
        let config = SessionConfig {
            session_lifetime: Duration::zero(),
            ..SessionConfig::with_secret("this-is-a-very-long-secret-key-for-testing")
        };
        assert_eq!(config.validate(), Err("session_lifetime must be positive"));
    }

    #[test]
    fn test_validate_valid_secret() {
        let config = SessionConfig::with_secret("this-is-a-very-long-secret-key-for-testing");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_same_site_deserialize() {
        let same_site: SameSite = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(same_site, SameSite::Strict);
    }
}
