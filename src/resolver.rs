//! Maps a verified session payload to an account.

use crate::{AuthError, SessionUser, UserRepository};

/// Result of resolving a verified session payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    User(SessionUser),
    /// The id is well formed but no account has it.
    NoSuchUser,
    /// The payload is not a decimal user id.
    Malformed,
}

/// Stateless lookup against a [`UserRepository`].
///
/// Nothing is cached: every call is a fresh storage round-trip. Storage
/// failures are returned as errors and never reported as a missing user.
#[derive(Debug, Clone)]
pub struct UserResolver<U> {
    user_repository: U,
}

impl<U: UserRepository> UserResolver<U> {
    pub fn new(user_repository: U) -> Self {
        UserResolver { user_repository }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resolve_session", skip_all, err)
    )]
    pub async fn resolve(&self, session_id: &str) -> Result<Resolution, AuthError> {
        let Ok(user_id) = session_id.parse::<i64>() else {
            return Ok(Resolution::Malformed);
        };

        Ok(self
            .user_repository
            .find_session_user(user_id)
            .await?
            .map_or(Resolution::NoSuchUser, Resolution::User))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resolve_api_token", skip_all, err)
    )]
    pub async fn resolve_token(&self, token: &str) -> Result<Option<SessionUser>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.user_repository.find_user_by_token(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockUserRepository, User};

    fn repo_with_user() -> MockUserRepository {
        let repo = MockUserRepository::new();
        let mut user = User::mock_from_credentials("admin", "hash");
        user.id = 42;
        repo.users.lock().unwrap().push(user);
        repo
    }

    #[tokio::test]
    async fn test_resolve_existing_user() {
        let resolver = UserResolver::new(repo_with_user());
        match resolver.resolve("42").await.unwrap() {
            Resolution::User(user) => {
                assert_eq!(user.id, 42);
                assert_eq!(user.username, "admin");
            }
            other => panic!("expected a user, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let resolver = UserResolver::new(repo_with_user());
        assert_eq!(resolver.resolve("7").await.unwrap(), Resolution::NoSuchUser);
    }

    #[tokio::test]
    async fn test_resolve_non_numeric_payload() {
        let resolver = UserResolver::new(repo_with_user());
        assert_eq!(resolver.resolve("admin").await.unwrap(), Resolution::Malformed);
        assert_eq!(resolver.resolve("").await.unwrap(), Resolution::Malformed);
        assert_eq!(resolver.resolve("4.2").await.unwrap(), Resolution::Malformed);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let repo = repo_with_user();
        repo.set_unavailable(true);
        let resolver = UserResolver::new(repo);

        let result = resolver.resolve("42").await;
        assert!(matches!(result, Err(AuthError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_resolve_token() {
        let resolver = UserResolver::new(repo_with_user());
        let user = resolver
            .resolve_token("mocktoken.MTcwMDAwMDAwMDAwMA")
            .await
            .unwrap();
        assert_eq!(user.map(|u| u.id), Some(42));
        assert_eq!(resolver.resolve_token("nope").await.unwrap(), None);
        assert_eq!(resolver.resolve_token("").await.unwrap(), None);
    }
}
