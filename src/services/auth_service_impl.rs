//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::services::auth_service::{
    AuthError, AuthScheme, AuthService, Credentials, Identity, Principal,
};
use crate::services::token::TokenCodec;
use async_trait::async_trait;
use tracing::debug;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenCodec>,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenCodec>, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }

    /// `None` when the token does not verify. A verified token whose user has
    /// been deleted resolves to `Anonymous`.
    async fn resolve_token(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let user_id = match self.tokens.verify(token) {
            Ok(id) => id,
            Err(rejection) => {
                debug!("Token not accepted: {rejection}");
                return Ok(None);
            }
        };

        let identity = match self.store.get_user(user_id).await? {
            Some(user) => Identity::Authenticated(Principal {
                user,
                scheme: AuthScheme::Token,
            }),
            None => {
                debug!("Token refers to missing user {user_id}");
                Identity::Anonymous
            }
        };

        Ok(Some(identity))
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn resolve(&self, credentials: Option<Credentials>) -> Result<Identity, AuthError> {
        match credentials {
            None => Ok(Identity::Anonymous),

            Some(Credentials::Bearer(token)) => Ok(self
                .resolve_token(&token)
                .await?
                .unwrap_or(Identity::Rejected)),

            Some(Credentials::Basic { username, password }) => {
                if let Some(identity) = self.resolve_token(&username).await? {
                    return Ok(identity);
                }

                let identity = self
                    .store
                    .verify_user_credentials(&username, &password, &self.security)
                    .await?
                    .map_or(Identity::Rejected, |user| {
                        Identity::Authenticated(Principal {
                            user,
                            scheme: AuthScheme::Password,
                        })
                    });

                Ok(identity)
            }
        }
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        Ok(self.tokens.issue(user.id)?)
    }
}
