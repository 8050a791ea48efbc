use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::{AuthError, SessionUser, User, UserRepository};

/// Columns handed to request handlers; the password hash is never selected.
const SESSION_COLUMNS: &str = "id, username, token, is_admin, use_embed, embed_site_name, embed_title, embed_color, embed_desc";

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    password: String,
    token: String,
    is_admin: bool,
    use_embed: bool,
    embed_site_name: Option<String>,
    embed_title: Option<String>,
    embed_color: String,
    embed_desc: Option<String>,
}

impl From<UserRecord> for User {
    fn from(row: UserRecord) -> Self {
        User {
            id: row.id,
            username: row.username,
            password: row.password,
            token: row.token,
            is_admin: row.is_admin,
            use_embed: row.use_embed,
            embed_site_name: row.embed_site_name,
            embed_title: row.embed_title,
            embed_color: row.embed_color,
            embed_desc: row.embed_desc,
        }
    }
}

#[derive(FromRow)]
struct SessionUserRecord {
    id: i64,
    username: String,
    token: String,
    is_admin: bool,
    use_embed: bool,
    embed_site_name: Option<String>,
    embed_title: Option<String>,
    embed_color: String,
    embed_desc: Option<String>,
}

impl From<SessionUserRecord> for SessionUser {
    fn from(row: SessionUserRecord) -> Self {
        SessionUser {
            id: row.id,
            username: row.username,
            token: row.token,
            is_admin: row.is_admin,
            use_embed: row.use_embed,
            embed_site_name: row.embed_site_name,
            embed_title: row.embed_title,
            embed_color: row.embed_color,
            embed_desc: row.embed_desc,
        }
    }
}

/// `UNIQUE` on `users.username` becomes `UsernameTaken`; a token collision
/// stays a database error.
fn write_error(operation: &str, e: &sqlx::Error) -> AuthError {
    match e {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && db.message().contains("users.username") =>
        {
            AuthError::UsernameTaken
        }
        other => database_error(operation, other),
    }
}

fn database_error(operation: &str, e: &sqlx::Error) -> AuthError {
    log::error!(target: "draconic::sqlite", "msg=\"database error\" operation=\"{operation}\" error=\"{e}\"");
    AuthError::DatabaseError(e.to_string())
}

impl SqliteUserRepository {
    async fn update_one<'a>(
        &self,
        operation: &str,
        query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
    ) -> Result<(), AuthError> {
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(operation, &e))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_session_user(&self, id: i64) -> Result<Option<SessionUser>, AuthError> {
        let row: Option<SessionUserRecord> =
            sqlx::query_as(&format!("SELECT {SESSION_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find_session_user", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row: Option<UserRecord> = sqlx::query_as(
            "SELECT id, username, password, token, is_admin, use_embed, embed_site_name, embed_title, embed_color, embed_desc FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find_user_by_username", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn find_user_by_token(&self, token: &str) -> Result<Option<SessionUser>, AuthError> {
        let row: Option<SessionUserRecord> =
            sqlx::query_as(&format!("SELECT {SESSION_COLUMNS} FROM users WHERE token = ?"))
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find_user_by_token", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, hashed_password, token), err)
    )]
    async fn create_user(
        &self,
        username: &str,
        hashed_password: &str,
        token: &str,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        let row: UserRecord = sqlx::query_as(
            "INSERT INTO users (username, password, token, is_admin) VALUES (?, ?, ?, ?) RETURNING id, username, password, token, is_admin, use_embed, embed_site_name, embed_title, embed_color, embed_desc",
        )
        .bind(username)
        .bind(hashed_password)
        .bind(token)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create_user", &e))?;

        Ok(row.into())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, hashed_password), err)
    )]
    async fn update_password(&self, user_id: i64, hashed_password: &str) -> Result<(), AuthError> {
        self.update_one(
            "update_password",
            sqlx::query("UPDATE users SET password = ? WHERE id = ?")
                .bind(hashed_password)
                .bind(user_id),
        )
        .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update_username(&self, user_id: i64, username: &str) -> Result<(), AuthError> {
        self.update_one(
            "update_username",
            sqlx::query("UPDATE users SET username = ? WHERE id = ?")
                .bind(username)
                .bind(user_id),
        )
        .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update_embed(
        &self,
        user_id: i64,
        title: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), AuthError> {
        self.update_one(
            "update_embed",
            sqlx::query(
                "UPDATE users SET embed_title = COALESCE(?, embed_title), embed_color = COALESCE(?, embed_color) WHERE id = ?",
            )
            .bind(title)
            .bind(color)
            .bind(user_id),
        )
        .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, token), err))]
    async fn update_token(&self, user_id: i64, token: &str) -> Result<(), AuthError> {
        self.update_one(
            "update_token",
            sqlx::query("UPDATE users SET token = ? WHERE id = ?")
                .bind(token)
                .bind(user_id),
        )
        .await
    }
}
