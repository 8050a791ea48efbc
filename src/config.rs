//! Process configuration.
//!
//! Values are read from `draconic.toml` and then from `DRACONIC_`-prefixed
//! environment variables, with `__` separating nested keys:
//!
//! ```toml
//! [core]
//! secret = "a-long-random-string-of-at-least-32-bytes"
//! host = "0.0.0.0"
//! port = 3000
//! database_url = "sqlite:./draconic.db"
//!
//! [session]
//! lifetime_seconds = 604800
//! same_site = "lax"
//! ```
//!
//! `DRACONIC_CORE__SECRET=...` overrides the secret from the file.

use chrono::Duration;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

use crate::session::{SameSite, SessionConfig};
use crate::{AuthError, SecretString};

pub const DEFAULT_CONFIG_FILE: &str = "draconic.toml";
pub const ENV_PREFIX: &str = "DRACONIC_";

#[derive(Debug, Clone, Deserialize)]
pub struct DraconicConfig {
    pub core: CoreConfig,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Signs every session cookie. Changing it logs everyone out.
    pub secret: SecretString,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSite,
    #[serde(default = "default_lifetime_seconds")]
    pub lifetime_seconds: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_domain: None,
            secure: false,
            same_site: SameSite::default(),
            lifetime_seconds: default_lifetime_seconds(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite::memory:".to_owned()
}

fn default_cookie_name() -> String {
    "user".to_owned()
}

const fn default_lifetime_seconds() -> i64 {
    604_800
}

impl DraconicConfig {
    /// Loads `draconic.toml` from the working directory plus the environment.
    pub fn load() -> Result<Self, AuthError> {
        Self::figment(DEFAULT_CONFIG_FILE)
            .extract()
            .map_err(|e| AuthError::ConfigurationError(e.to_string()))
    }

    pub fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Builds and validates the session cookie settings.
    pub fn session_config(&self) -> Result<SessionConfig, AuthError> {
        let config = SessionConfig {
            cookie_name: self.session.cookie_name.clone(),
            cookie_domain: self.session.cookie_domain.clone(),
            cookie_secure: self.session.secure,
            cookie_same_site: self.session.same_site,
            session_lifetime: Duration::seconds(self.session.lifetime_seconds),
            secret_key: self.core.secret.clone(),
            ..SessionConfig::default()
        };
        config
            .validate()
            .map_err(|msg| AuthError::ConfigurationError(msg.to_owned()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.core.host, self.core.port)
    }
}
