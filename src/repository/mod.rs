//! Storage abstraction for accounts.
//!
//! Implement [`UserRepository`] to plug in a database. A `SQLite`
//! implementation lives in `crate::sqlite` behind the `sqlx_sqlite` feature.
//! Enable the `mocks` feature for [`MockUserRepository`].

mod user;

#[cfg(any(test, feature = "mocks"))]
mod user_mock;

pub use user::{DEFAULT_EMBED_COLOR, SessionUser, User, UserRepository};

#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
