//! Domain service for user accounts.

use thiserror::Error;

use crate::db::User;
use crate::services::auth_service::AuthError;

/// Errors specific to user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<AuthError> for UserError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(msg) => Self::Database(msg),
            AuthError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct UserWithToken {
    pub user: User,
    pub token: String,
}

/// Domain service trait for user accounts.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    async fn get_user(&self, id: i32) -> Result<User, UserError>;

    /// Creates an account and hands back a token for it.
    async fn register(&self, username: &str, password: &str) -> Result<UserWithToken, UserError>;

    /// Changes username and/or password, then issues a new token.
    /// Tokens issued earlier remain valid until they expire.
    async fn update_user(
        &self,
        id: i32,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<UserWithToken, UserError>;

    async fn delete_user(&self, id: i32) -> Result<(), UserError>;
}
