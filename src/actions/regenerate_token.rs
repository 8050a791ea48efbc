use crate::crypto::create_token;
use crate::{AuthError, UserRepository};

/// Replaces a user's API token. The previous token stops working immediately.
pub struct RegenerateTokenAction<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> RegenerateTokenAction<U> {
    pub fn new(user_repository: U) -> Self {
        RegenerateTokenAction { user_repository }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "regenerate_token", skip_all, err)
    )]
    pub async fn execute(&self, user_id: i64) -> Result<String, AuthError> {
        let token = create_token();
        self.user_repository.update_token(user_id, &token).await?;
        log::info!(target: "draconic::user", "msg=\"api token regenerated\" user_id={user_id}");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockUserRepository;

    #[tokio::test]
    async fn test_regenerate_token_replaces_old_one() {
        let repo = MockUserRepository::new();
        let user = repo.create_user("admin", "hash", "old-token", false).await.unwrap();

        let action = RegenerateTokenAction::new(repo.clone());
        let token = action.execute(user.id).await.unwrap();

        assert_ne!(token, "old-token");
        assert!(repo.find_user_by_token("old-token").await.unwrap().is_none());
        assert_eq!(
            repo.find_user_by_token(&token).await.unwrap().map(|u| u.id),
            Some(user.id)
        );
    }

    #[tokio::test]
    async fn test_regenerate_token_unknown_user() {
        let action = RegenerateTokenAction::new(MockUserRepository::new());
        assert_eq!(action.execute(5).await.unwrap_err(), AuthError::UserNotFound);
    }
}
