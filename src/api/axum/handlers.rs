//! HTTP handlers for the session and account endpoints.

use axum::Json;
use axum::extract::State;
use axum::response::Response;

use super::context::AuthContext;
use super::error::AppError;
use super::routes::AppState;
use crate::actions::{LoginAction, RegenerateTokenAction, UpdateUserAction, UserChanges};
use crate::api::{LoginRequest, MessageResponse, TokenResponse, UpdateUserRequest};
use crate::session::CookieOptions;
use crate::{SecretString, SessionUser, UserRepository};

const UNAUTHORIZED: &str = "Unauthorized";

/// Check credentials and issue the session cookie.
///
/// POST /auth/login
pub async fn login<U>(
    State(state): State<AppState<U>>,
    ctx: AuthContext<U>,
    Json(body): Json<LoginRequest>,
) -> Response
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let action = LoginAction::with_hasher(state.user_repo.clone(), state.hasher.clone());
    let password = SecretString::new(body.password);

    match action.execute(&body.username, &password).await {
        Ok(user) => {
            ctx.set_cookie(
                &state.session.cookie_name,
                &user.id.to_string(),
                &CookieOptions::session(&state.session),
            );
            ctx.json(&SessionUser::from(user))
        }
        Err(err) => ctx.fail(&err),
    }
}

/// Clear the session cookie.
///
/// POST /auth/logout
pub async fn logout<U>(State(state): State<AppState<U>>, ctx: AuthContext<U>) -> Response
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    ctx.clean_cookie(&state.session.cookie_name);
    ctx.json(&MessageResponse {
        message: "Logged out".to_owned(),
    })
}

/// GET /user
pub async fn get_current_user<U>(ctx: AuthContext<U>) -> Result<Response, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let Some(user) = ctx.user().await? else {
        return Ok(ctx.forbid(UNAUTHORIZED));
    };
    Ok(ctx.json(&user))
}

/// Change password, username or embed settings of the signed-in account.
///
/// PATCH /user
pub async fn update_current_user<U>(
    State(state): State<AppState<U>>,
    ctx: AuthContext<U>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Response, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let Some(user) = ctx.user().await? else {
        return Ok(ctx.forbid(UNAUTHORIZED));
    };

    let action = UpdateUserAction::with_hasher(state.user_repo.clone(), state.hasher.clone());
    match action.execute(&user, &UserChanges::from(body)).await {
        Ok(updated) => Ok(ctx.json(&updated)),
        Err(err) => Ok(ctx.fail(&err)),
    }
}

/// Identify an upload client by its `Token` header.
///
/// GET /user/token
pub async fn get_token_user<U>(ctx: AuthContext<U>) -> Result<Response, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let Some(user) = ctx.token_user().await? else {
        return Ok(ctx.forbid(UNAUTHORIZED));
    };
    Ok(ctx.json(&user))
}

/// Issue a new API token for the signed-in account.
///
/// POST /user/token
pub async fn regenerate_token<U>(
    State(state): State<AppState<U>>,
    ctx: AuthContext<U>,
) -> Result<Response, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let Some(user) = ctx.user().await? else {
        return Ok(ctx.forbid(UNAUTHORIZED));
    };

    let token = RegenerateTokenAction::new(state.user_repo.clone())
        .execute(user.id)
        .await?;
    Ok(ctx.json(&TokenResponse { token }))
}
