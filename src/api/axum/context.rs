//! Per-request authentication context.
//!
//! [`AuthContext`] is built once per request from the request headers, the
//! cookie codec and the user repository. Handlers take it as an extractor and
//! use it for everything authentication related:
//!
//! - reading and writing signed cookies ([`AuthContext::get_cookie`],
//!   [`AuthContext::set_cookie`], [`AuthContext::clean_cookie`]),
//! - resolving the session user ([`AuthContext::user`]) or the API token
//!   user ([`AuthContext::token_user`]),
//! - building JSON responses that carry any queued `Set-Cookie` headers
//!   ([`AuthContext::json`], [`AuthContext::error`], [`AuthContext::bad`],
//!   [`AuthContext::forbid`]).
//!
//! A request moves through `no cookie -> invalid signature | valid payload ->
//! no such user | user`. Only the last state is authenticated. An invalid
//! signature, a non-numeric payload and an unknown id also clear the cookie so
//! the client stops presenting it.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use cookie::Cookie;
use serde::Serialize;

use super::error::error_body;
use super::routes::AppState;
use crate::api::ErrorResponse;
use crate::resolver::{Resolution, UserResolver};
use crate::session::{
    CookieCodec, CookieOptions, SessionConfig, Verification, build_cookie, build_removal_cookie,
};
use crate::{AuthError, SessionUser, UserRepository};

/// Header carrying the API token of programmatic upload clients.
pub const API_TOKEN_HEADER: &str = "token";

pub struct AuthContext<U> {
    codec: CookieCodec,
    resolver: UserResolver<U>,
    session_cookie: String,
    cookie_path: String,
    request_cookies: HashMap<String, String>,
    api_token: Option<String>,
    outgoing: Mutex<Vec<Cookie<'static>>>,
}

impl<U: UserRepository> AuthContext<U> {
    pub fn new(
        codec: CookieCodec,
        user_repository: U,
        config: &SessionConfig,
        headers: &HeaderMap,
    ) -> Self {
        let api_token = headers
            .get(API_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        Self {
            codec,
            resolver: UserResolver::new(user_repository),
            session_cookie: config.cookie_name.clone(),
            cookie_path: config.cookie_path.clone(),
            request_cookies: parse_request_cookies(headers),
            api_token,
            outgoing: Mutex::new(Vec::new()),
        }
    }

    fn read_cookie(&self, name: &str) -> Option<Verification> {
        self.request_cookies
            .get(name)
            .map(|value| self.codec.decode(value))
    }

    /// Verified payload of the named cookie, `None` when absent or invalid.
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        self.read_cookie(name)
            .and_then(Verification::into_payload)
    }

    /// Signs `value` and queues it as a `Set-Cookie` header.
    pub fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) {
        self.queue(build_cookie(name, self.codec.encode(value), options));
    }

    /// Queues an already-expired, empty cookie. Safe to call repeatedly.
    pub fn clean_cookie(&self, name: &str) {
        self.queue(build_removal_cookie(name, &self.cookie_path));
    }

    /// A later cookie with the same name replaces an earlier one.
    fn queue(&self, cookie: Cookie<'static>) {
        let mut outgoing = self.outgoing.lock().unwrap_or_else(PoisonError::into_inner);
        outgoing.retain(|queued| queued.name() != cookie.name());
        outgoing.push(cookie);
    }

    /// `Set-Cookie` values queued so far.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.outgoing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Resolves the session user from the signed session cookie.
    ///
    /// Not memoised: each call is a new storage round-trip. Storage errors
    /// are returned, never turned into `Ok(None)`.
    pub async fn user(&self) -> Result<Option<SessionUser>, AuthError> {
        let session_id = match self.read_cookie(&self.session_cookie) {
            None => return Ok(None),
            Some(Verification::Verified(session_id)) => session_id,
            Some(Verification::Invalid) => {
                log::warn!(target: "draconic::session", "msg=\"session cookie failed verification\" action=\"clear\"");
                self.clean_cookie(&self.session_cookie);
                return Ok(None);
            }
        };

        match self.resolver.resolve(&session_id).await? {
            Resolution::User(user) => Ok(Some(user)),
            Resolution::NoSuchUser | Resolution::Malformed => {
                log::warn!(target: "draconic::session", "msg=\"session cookie names no user\" action=\"clear\"");
                self.clean_cookie(&self.session_cookie);
                Ok(None)
            }
        }
    }

    /// Resolves the user owning the API token in the `Token` header.
    pub async fn token_user(&self) -> Result<Option<SessionUser>, AuthError> {
        match self.api_token {
            Some(ref token) => self.resolver.resolve_token(token).await,
            None => Ok(None),
        }
    }

    /// 400 `{code, error}`.
    pub fn error(&self, message: impl Into<String>) -> Response {
        self.envelope(StatusCode::BAD_REQUEST, message.into())
    }

    /// 401 `{code, error}`.
    pub fn bad(&self, message: impl Into<String>) -> Response {
        self.envelope(StatusCode::UNAUTHORIZED, message.into())
    }

    /// 403 `{code, error}`.
    pub fn forbid(&self, message: impl Into<String>) -> Response {
        self.envelope(StatusCode::FORBIDDEN, message.into())
    }

    /// 200 with `payload` as the body.
    pub fn json<T: Serialize>(&self, payload: &T) -> Response {
        self.json_with_status(StatusCode::OK, payload)
    }

    pub fn json_with_status<T: Serialize>(&self, status: StatusCode, payload: &T) -> Response {
        let mut response = (status, Json(payload)).into_response();
        self.attach_cookies(response.headers_mut());
        response
    }

    /// Envelope for an action error, keeping queued cookies.
    pub fn fail(&self, err: &AuthError) -> Response {
        let (status, body) = error_body(err);
        self.json_with_status(status, &body)
    }

    fn envelope(&self, status: StatusCode, message: String) -> Response {
        self.json_with_status(status, &ErrorResponse::new(status.as_u16(), message))
    }

    fn attach_cookies(&self, headers: &mut HeaderMap) {
        let outgoing = self.outgoing.lock().unwrap_or_else(PoisonError::into_inner);
        for cookie in outgoing.iter() {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => {
                    log::error!(target: "draconic::session", "msg=\"unencodable cookie dropped\" name=\"{}\" error=\"{e}\"", cookie.name());
                }
            }
        }
    }
}

/// First occurrence wins when a name repeats.
fn parse_request_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(header).flatten() {
            cookies
                .entry(cookie.name().to_owned())
                .or_insert_with(|| cookie.value().to_owned());
        }
    }
    cookies
}

impl<U> FromRequestParts<AppState<U>> for AuthContext<U>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U>,
    ) -> Result<Self, Self::Rejection> {
        Ok(AuthContext::new(
            state.codec.clone(),
            state.user_repo.clone(),
            &state.session,
            &parts.headers,
        ))
    }
}
