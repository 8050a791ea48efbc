#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::user::{DEFAULT_EMBED_COLOR, SessionUser, User, UserRepository};
use crate::AuthError;

/// In-memory accounts.
///
/// [`MockUserRepository::set_unavailable`] makes every call fail with a
/// database error, to exercise outage handling.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AuthError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::DatabaseError("connection refused".to_owned()));
        }
        Ok(())
    }

    fn modify<F>(&self, user_id: i64, apply: F) -> Result<(), AuthError>
    where
        F: FnOnce(&mut User),
    {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AuthError::UserNotFound)?;
        apply(user);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_session_user(&self, id: i64) -> Result<Option<SessionUser>, AuthError> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned().map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<SessionUser>, AuthError> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.token == token).cloned().map(Into::into))
    }

    async fn create_user(
        &self,
        username: &str,
        hashed_password: &str,
        token: &str,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::UsernameTaken);
        }

        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: username.to_owned(),
            password: hashed_password.to_owned(),
            token: token.to_owned(),
            is_admin,
            use_embed: false,
            embed_site_name: None,
            embed_title: None,
            embed_color: DEFAULT_EMBED_COLOR.to_owned(),
            embed_desc: None,
        };
        users.push(user.clone());
        drop(users);

        Ok(user)
    }

    async fn update_password(&self, user_id: i64, hashed_password: &str) -> Result<(), AuthError> {
        self.modify(user_id, |user| hashed_password.clone_into(&mut user.password))
    }

    async fn update_username(&self, user_id: i64, username: &str) -> Result<(), AuthError> {
        self.check_available()?;
        let taken = self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username && u.id != user_id);
        if taken {
            return Err(AuthError::UsernameTaken);
        }
        self.modify(user_id, |user| username.clone_into(&mut user.username))
    }

    async fn update_embed(
        &self,
        user_id: i64,
        title: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), AuthError> {
        self.modify(user_id, |user| {
            if let Some(title) = title {
                user.embed_title = Some(title.to_owned());
            }
            if let Some(color) = color {
                color.clone_into(&mut user.embed_color);
            }
        })
    }

    async fn update_token(&self, user_id: i64, token: &str) -> Result<(), AuthError> {
        self.modify(user_id, |user| token.clone_into(&mut user.token))
    }
}
