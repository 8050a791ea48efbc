//! `SQLite` storage backend.

pub mod migrations;
mod user;

pub use user::SqliteUserRepository;
