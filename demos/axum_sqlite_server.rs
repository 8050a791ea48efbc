#![allow(
    clippy::print_stdout,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::str_to_string,
    clippy::missing_docs_in_private_items,
    clippy::doc_markdown
)]

//! Axum SQLite Session Server Example
//!
//! Serves the login, logout and account endpoints under `/api`, with the
//! session carried in a signed `user` cookie.
//!
//! Run with: `cargo run --example axum_sqlite_server --features "axum_api sqlx_sqlite"`
//!
//! Configuration comes from `draconic.toml` and `DRACONIC_*` variables:
//!   DRACONIC_CORE__SECRET=<at least 32 bytes> (required)
//!   DRACONIC_CORE__DATABASE_URL=sqlite:./draconic.db?mode=rwc (optional)
//!   DRACONIC_ADMIN_PASSWORD=... (optional, seeds an `admin` account)
//!
//! Test endpoints:
//!   curl -c jar -X POST http://localhost:3000/api/auth/login \
//!     -H "Content-Type: application/json" \
//!     -d '{"username": "admin", "password": "..."}'
//!   curl -b jar http://localhost:3000/api/user

use axum::Router;
use draconic::api::axum::{AppState, api_routes, permissive_cors};
use draconic::crypto::{Argon2Hasher, PasswordHasher, create_token};
use draconic::sqlite::{SqliteUserRepository, migrations};
use draconic::{DraconicConfig, SecretString, UserRepository};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DraconicConfig::load().expect("Failed to load configuration");
    let session = config
        .session_config()
        .expect("Invalid session configuration");

    // A memory database lives per connection, so it gets a single one
    let max_connections = if config.core.database_url.contains(":memory:") {
        1
    } else {
        5
    };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&config.core.database_url)
        .await
        .expect("Failed to create pool");

    migrations::run(&pool)
        .await
        .expect("Failed to run migrations");

    let user_repo = SqliteUserRepository::new(pool);

    if let Ok(password) = std::env::var("DRACONIC_ADMIN_PASSWORD") {
        seed_admin(&user_repo, &SecretString::new(password)).await;
    }

    let state = AppState::new(user_repo, session);

    let app = Router::new()
        .nest("/api", api_routes::<SqliteUserRepository>())
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let address = config.bind_address();
    println!("Starting Axum SQLite session server on http://{address}");
    println!("Database: {}", config.core.database_url);
    println!("Endpoints:");
    println!("  POST  /api/auth/login   - Sign in (sets the user cookie)");
    println!("  POST  /api/auth/logout  - Sign out (clears the user cookie)");
    println!("  GET   /api/user         - Current user");
    println!("  PATCH /api/user         - Update password, username or embed");
    println!("  GET   /api/user/token   - User owning the Token header");
    println!("  POST  /api/user/token   - Regenerate the API token");

    let listener = TcpListener::bind(&address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn seed_admin(user_repo: &SqliteUserRepository, password: &SecretString) {
    if user_repo
        .find_user_by_username("admin")
        .await
        .expect("Failed to look up admin")
        .is_some()
    {
        return;
    }

    let hashed = Argon2Hasher::default()
        .hash(password)
        .expect("Failed to hash admin password");
    user_repo
        .create_user("admin", &hashed, &create_token(), true)
        .await
        .expect("Failed to create admin");
    println!("Seeded admin account");
}
