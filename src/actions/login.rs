use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::{AuthError, SecretString, User, UserRepository};

pub struct LoginAction<U, H = Argon2Hasher>
where
    U: UserRepository,
{
    user_repository: U,
    hasher: H,
}

impl<U: UserRepository> LoginAction<U, Argon2Hasher> {
    pub fn new(user_repository: U) -> Self {
        Self {
            user_repository,
            hasher: Argon2Hasher::default(),
        }
    }
}

impl<U: UserRepository, H: PasswordHasher> LoginAction<U, H> {
    pub fn with_hasher(user_repository: U, hasher: H) -> Self {
        Self {
            user_repository,
            hasher,
        }
    }

    /// Checks a username and password pair.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// `AuthError::InvalidCredentials`.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "login", skip_all, err))]
    pub async fn execute(&self, username: &str, password: &SecretString) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Missing username or password".to_owned(),
            ));
        }

        let Some(user) = self.user_repository.find_user_by_username(username).await? else {
            log::info!(target: "draconic::login", "msg=\"login failed\" reason=\"unknown user\"");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password)? {
            log::info!(target: "draconic::login", "msg=\"login failed\" reason=\"wrong password\" user_id={}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        log::info!(target: "draconic::login", "msg=\"login succeeded\" user_id={}", user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockUserRepository;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(8192, 1, 1)
    }

    async fn repo_with(username: &str, password: &str) -> MockUserRepository {
        let repo = MockUserRepository::new();
        let hashed = hasher().hash(&SecretString::new(password)).unwrap();
        repo.create_user(username, &hashed, "token", false)
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_login_success() {
        let repo = repo_with("admin", "password").await;
        let action = LoginAction::with_hasher(repo, hasher());

        let user = action
            .execute("admin", &SecretString::new("password"))
            .await
            .unwrap();
        assert_eq!(user.username, "admin");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let repo = repo_with("admin", "password").await;
        let action = LoginAction::with_hasher(repo, hasher());

        let result = action.execute("admin", &SecretString::new("nope")).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let repo = repo_with("admin", "password").await;
        let action = LoginAction::with_hasher(repo, hasher());

        let result = action.execute("ghost", &SecretString::new("password")).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let action = LoginAction::with_hasher(MockUserRepository::new(), hasher());

        let result = action.execute("", &SecretString::new("password")).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_storage_failure() {
        let repo = repo_with("admin", "password").await;
        repo.set_unavailable(true);
        let action = LoginAction::with_hasher(repo, hasher());

        let result = action.execute("admin", &SecretString::new("password")).await;
        assert!(matches!(result, Err(AuthError::DatabaseError(_))));
    }
}
