use serde::{Deserialize, Serialize};

use crate::SecretString;
use crate::actions::UserChanges;

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `PATCH /user`. Empty strings count as "not provided".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub embed_title: Option<String>,
    #[serde(default)]
    pub embed_color: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(body: UpdateUserRequest) -> Self {
        fn provided(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        UserChanges {
            password: provided(body.password).map(SecretString::new),
            username: provided(body.username),
            embed_title: provided(body.embed_title),
            embed_color: provided(body.embed_color),
        }
    }
}

// Response DTOs

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every error response: `{"code": 403, "error": "Unauthorized"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: u16, error: impl Into<String>) -> Self {
        Self {
            code,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new(401, "Wrong credentials")).unwrap();
        assert_eq!(json, serde_json::json!({"code": 401, "error": "Wrong credentials"}));
    }

    #[test]
    fn test_update_request_ignores_empty_fields() {
        let body: UpdateUserRequest = serde_json::from_str(
            r#"{"password": "", "username": "root", "embedTitle": "CDN"}"#,
        )
        .unwrap();
        let changes = UserChanges::from(body);

        assert!(changes.password.is_none());
        assert_eq!(changes.username.as_deref(), Some("root"));
        assert_eq!(changes.embed_title.as_deref(), Some("CDN"));
        assert!(changes.embed_color.is_none());
    }

    #[test]
    fn test_token_response_debug_is_redacted() {
        let response = TokenResponse {
            token: "abc.def".to_owned(),
        };
        assert!(!format!("{response:?}").contains("abc.def"));
    }
}
