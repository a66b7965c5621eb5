//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::db::{Store, User, UserChanges};
use crate::services::auth_service::AuthService;
use crate::services::user_service::{UserError, UserService, UserWithToken};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmUserService {
    store: Store,
    auth: Arc<dyn AuthService>,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub fn new(store: Store, auth: Arc<dyn AuthService>, security: SecurityConfig) -> Self {
        Self {
            store,
            auth,
            security,
        }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn get_user(&self, id: i32) -> Result<User, UserError> {
        self.store.get_user(id).await?.ok_or(UserError::NotFound(id))
    }

    async fn register(&self, username: &str, password: &str) -> Result<UserWithToken, UserError> {
        let user = self
            .store
            .create_user(username, Some(password), &self.security)
            .await?;
        let token = self.auth.issue_token(&user)?;

        info!("Registered user {}: {}", user.id, user.username);
        Ok(UserWithToken { user, token })
    }

    async fn update_user(
        &self,
        id: i32,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<UserWithToken, UserError> {
        let changes = UserChanges { username, password };
        let user = self
            .store
            .update_user(id, changes, &self.security)
            .await?
            .ok_or(UserError::NotFound(id))?;
        let token = self.auth.issue_token(&user)?;

        if password.is_some() {
            info!("Password changed for user: {}", user.username);
        }
        Ok(UserWithToken { user, token })
    }

    async fn delete_user(&self, id: i32) -> Result<(), UserError> {
        if self.store.delete_user(id).await? {
            info!("Deleted user {id}");
            Ok(())
        } else {
            Err(UserError::NotFound(id))
        }
    }
}
