use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::services::token::generate_secret;
use crate::services::{
    AccessPolicy, AuthService, CatalogService, SeaOrmAuthService, SeaOrmCatalogService,
    SeaOrmUserService, TokenCodec, UserService,
};

/// Build the token codec from configuration. The secret is read exactly once
/// here and never again for the life of the process.
#[must_use]
pub fn build_token_codec(config: &Config) -> TokenCodec {
    let secret = config.security.secret_key.clone().unwrap_or_else(|| {
        warn!("No security.secret_key configured; generated a random one. Tokens will not survive a restart");
        generate_secret()
    });

    TokenCodec::new(secret.as_bytes(), config.security.token_ttl_seconds)
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub tokens: Arc<TokenCodec>,

    pub policy: AccessPolicy,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let tokens = Arc::new(build_token_codec(&config));
        let policy = AccessPolicy::new(config.security.catalog_writes_require_token);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            tokens.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(store.clone()))
            as Arc<dyn CatalogService + Send + Sync + 'static>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            auth_service.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService + Send + Sync + 'static>;

        Self {
            config: Arc::new(config),
            store,
            tokens,
            policy,
            auth_service,
            catalog_service,
            user_service,
        }
    }
}
