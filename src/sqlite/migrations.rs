//! Embedded `SQLite` migrations.
//!
//! ```rust,ignore
//! use draconic::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const CORE_MIGRATIONS: &[(&str, &str)] = &[(
    "20240601000001_create_users_table",
    include_str!("../../migrations_sqlite/core/20240601000001_create_users_table.sql"),
)];

/// Applies pending migrations, tracked in `_draconic_migrations`.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _draconic_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in CORE_MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _draconic_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;
        if applied {
            continue;
        }

        // statements are split on `;`, so migrations must not put one inside a literal
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                pool.execute(trimmed).await?;
            }
        }

        sqlx::query("INSERT INTO _draconic_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(pool)
            .await?;
        log::info!(target: "draconic::sqlite", "msg=\"migration applied\" name=\"{name}\"");
    }
    Ok(())
}
