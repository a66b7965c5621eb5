//! Domain service for establishing who is making a request.
//!
//! Every request is resolved afresh into an [`Identity`]; nothing about the
//! outcome is remembered between requests.

use thiserror::Error;

use crate::db::User;
use crate::services::token::TokenIssueError;

/// Errors specific to authentication operations.
///
/// Bad credentials are not errors; they resolve to [`Identity::Rejected`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenIssueError> for AuthError {
    fn from(err: TokenIssueError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Credential presented with a request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    /// Username/password pair. The username slot may also hold a token.
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(..)"),
            Self::Basic { .. } => f.write_str("Basic(..)"),
        }
    }
}

/// How an authenticated identity proved itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Token,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user: User,
    pub scheme: AuthScheme,
}

/// Outcome of resolving request credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No credential, or a valid token for a user that no longer exists.
    Anonymous,
    /// A credential was presented and did not check out.
    Rejected,
    Authenticated(Principal),
}

impl Identity {
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            Self::Anonymous | Self::Rejected => None,
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.principal().map(|p| p.user.username.as_str())
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves the request credential into an identity.
    ///
    /// Token checks come first: a bearer token, or a Basic username that
    /// parses as a valid token, wins over the username/password reading.
    ///
    /// # Errors
    ///
    /// Only store failures are errors; bad credentials yield
    /// [`Identity::Rejected`].
    async fn resolve(&self, credentials: Option<Credentials>) -> Result<Identity, AuthError>;

    /// Issues a fresh bearer token for the user.
    fn issue_token(&self, user: &User) -> Result<String, AuthError>;
}
