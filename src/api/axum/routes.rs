use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use crate::crypto::Argon2Hasher;
use crate::session::{CookieCodec, SessionConfig};
use crate::UserRepository;

#[derive(Clone)]
pub struct AppState<U> {
    pub user_repo: U,
    pub codec: CookieCodec,
    pub session: SessionConfig,
    pub hasher: Argon2Hasher,
}

impl<U> AppState<U> {
    /// The codec is keyed with `session.secret_key`.
    pub fn new(user_repo: U, session: SessionConfig) -> Self {
        Self {
            user_repo,
            codec: CookieCodec::new(session.secret_key.clone()),
            session,
            hasher: Argon2Hasher::default(),
        }
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: Argon2Hasher) -> Self {
        self.hasher = hasher;
        self
    }
}

/// `/auth`: login and logout
pub fn auth_routes<U>() -> Router<AppState<U>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<U>))
        .route("/logout", post(handlers::logout::<U>))
}

/// `/user`: the signed-in account and its API token
pub fn user_routes<U>() -> Router<AppState<U>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/user",
            get(handlers::get_current_user::<U>).patch(handlers::update_current_user::<U>),
        )
        .route(
            "/user/token",
            get(handlers::get_token_user::<U>).post(handlers::regenerate_token::<U>),
        )
}

pub fn api_routes<U>() -> Router<AppState<U>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .nest("/auth", auth_routes())
        .merge(user_routes())
}
