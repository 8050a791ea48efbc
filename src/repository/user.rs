use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Default embed color for new accounts.
pub const DEFAULT_EMBED_COLOR: &str = "#2f3136";

/// A stored account, including the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub token: String,
    pub is_admin: bool,
    pub use_embed: bool,
    pub embed_site_name: Option<String>,
    pub embed_title: Option<String>,
    pub embed_color: String,
    pub embed_desc: Option<String>,
}

/// The fields of a [`User`] that may be handed to a request handler and
/// serialized back to the client. Carries no password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub token: String,
    pub is_admin: bool,
    pub use_embed: bool,
    pub embed_site_name: Option<String>,
    pub embed_title: Option<String>,
    pub embed_color: String,
    pub embed_desc: Option<String>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        SessionUser {
            id: user.id,
            username: user.username,
            token: user.token,
            is_admin: user.is_admin,
            use_embed: user.use_embed,
            embed_site_name: user.embed_site_name,
            embed_title: user.embed_title,
            embed_color: user.embed_color,
            embed_desc: user.embed_desc,
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock() -> Self {
        Self::mock_from_credentials("admin", "fakehashedpassword")
    }

    pub fn mock_from_credentials(username: &str, hashed_password: &str) -> Self {
        User {
            id: 1,
            username: username.to_owned(),
            password: hashed_password.to_owned(),
            token: "mocktoken.MTcwMDAwMDAwMDAwMA".to_owned(),
            is_admin: false,
            use_embed: false,
            embed_site_name: None,
            embed_title: None,
            embed_color: DEFAULT_EMBED_COLOR.to_owned(),
            embed_desc: None,
        }
    }
}

/// Storage collaborator for accounts.
///
/// Lookups that feed a request handler return [`SessionUser`], so the
/// password hash only leaves storage for a login check.
#[async_trait]
pub trait UserRepository {
    async fn find_session_user(&self, id: i64) -> Result<Option<SessionUser>, AuthError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;
    /// Exact match on the stored API token.
    async fn find_user_by_token(&self, token: &str) -> Result<Option<SessionUser>, AuthError>;
    async fn create_user(
        &self,
        username: &str,
        hashed_password: &str,
        token: &str,
        is_admin: bool,
    ) -> Result<User, AuthError>;
    async fn update_password(&self, user_id: i64, hashed_password: &str) -> Result<(), AuthError>;
    async fn update_username(&self, user_id: i64, username: &str) -> Result<(), AuthError>;
    /// `None` leaves the stored value untouched.
    async fn update_embed(
        &self,
        user_id: i64,
        title: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), AuthError>;
    async fn update_token(&self, user_id: i64, token: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_never_serializes_password() {
        let user = User::mock_from_credentials("admin", "$argon2id$secret-hash");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "admin");
    }

    #[test]
    fn test_session_user_uses_camel_case() {
        let session_user = SessionUser::from(User::mock());
        let json = serde_json::to_value(&session_user).unwrap();
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["embedColor"], DEFAULT_EMBED_COLOR);
        assert!(json.get("password").is_none());
    }
}
