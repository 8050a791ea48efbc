use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::{AuthError, SecretString, SessionUser, UserRepository};

/// Fields a user may change on their own account. `None` means unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub password: Option<SecretString>,
    pub username: Option<String>,
    pub embed_title: Option<String>,
    pub embed_color: Option<String>,
}

pub struct UpdateUserAction<U, H = Argon2Hasher>
where
    U: UserRepository,
{
    user_repository: U,
    hasher: H,
}

impl<U: UserRepository> UpdateUserAction<U, Argon2Hasher> {
    pub fn new(user_repository: U) -> Self {
        Self {
            user_repository,
            hasher: Argon2Hasher::default(),
        }
    }
}

impl<U: UserRepository, H: PasswordHasher> UpdateUserAction<U, H> {
    pub fn with_hasher(user_repository: U, hasher: H) -> Self {
        Self {
            user_repository,
            hasher,
        }
    }

    /// Applies `changes` to `user` and returns the stored result.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_user", skip_all, fields(user_id = user.id), err)
    )]
    pub async fn execute(
        &self,
        user: &SessionUser,
        changes: &UserChanges,
    ) -> Result<SessionUser, AuthError> {
        // everything that can reject the request runs before the first write
        if let Some(ref username) = changes.username {
            if username.trim().is_empty() {
                return Err(AuthError::Validation("Username cannot be empty".to_owned()));
            }
            let existing = self.user_repository.find_user_by_username(username).await?;
            if existing.is_some_and(|other| other.id != user.id) {
                return Err(AuthError::UsernameTaken);
            }
        }
        let hashed_password = match changes.password {
            Some(ref password) => Some(self.hasher.hash(password)?),
            None => None,
        };

        if let Some(ref username) = changes.username {
            self.user_repository.update_username(user.id, username).await?;
        }

        if let Some(ref hashed) = hashed_password {
            self.user_repository.update_password(user.id, hashed).await?;
        }

        if changes.embed_title.is_some() || changes.embed_color.is_some() {
            self.user_repository
                .update_embed(
                    user.id,
                    changes.embed_title.as_deref(),
                    changes.embed_color.as_deref(),
                )
                .await?;
        }

        let updated = self
            .user_repository
            .find_session_user(user.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        log::info!(target: "draconic::user", "msg=\"user updated\" user_id={} username=\"{}\" previous_username=\"{}\"", updated.id, updated.username, user.username);
        Ok(updated)
    }
}
