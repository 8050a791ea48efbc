//! Signed-cookie sessions and request authentication.
//!
//! A dashboard user is identified across stateless requests by a `user`
//! cookie whose value is `base64("{id}:{hmac}")`. Programmatic clients use a
//! long-lived API token instead. See [`session`] for the signing primitives,
//! [`resolver`] for identity lookup and `api::axum` for the per-request
//! authentication context.

pub mod actions;
pub mod api;
pub mod config;
pub mod crypto;
pub mod repository;
pub mod resolver;
mod secret;
pub mod session;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

use std::fmt;

pub use config::{CoreConfig, DraconicConfig};
pub use repository::{SessionUser, User, UserRepository};
#[cfg(any(test, feature = "mocks"))]
pub use repository::MockUserRepository;
pub use resolver::{Resolution, UserResolver};
pub use secret::SecretString;
pub use session::{CookieCodec, SessionConfig, Signer, Verification};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username or password did not match.
    InvalidCredentials,
    /// No authenticated user is attached to the request.
    Unauthorized,
    /// Authenticated, but not allowed to perform the action.
    Forbidden,
    UsernameTaken,
    Validation(String),
    UserNotFound,
    PasswordHashError,
    DatabaseError(String),
    ConfigurationError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Wrong credentials"),
            AuthError::Unauthorized => write!(f, "Unauthorized"),
            AuthError::Forbidden => write!(f, "Forbidden"),
            AuthError::UsernameTaken => write!(f, "Username is already taken"),
            AuthError::Validation(msg) => write!(f, "{msg}"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::PasswordHashError => write!(f, "Failed to hash password"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}
