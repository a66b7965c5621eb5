use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode, header::LOCATION},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AccessPolicy, AuthService, CatalogService, UserService};
use crate::state::SharedState;

pub mod auth;
mod categories;
mod error;
mod items;
mod observability;
mod types;
mod users;
pub mod validation;

pub use error::{ApiError, UNAUTHORIZED_MESSAGE};
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(shared: Arc<SharedState>, prometheus_handle: Option<PrometheusHandle>) -> Self {
        Self {
            shared,
            start_time: std::time::Instant::now(),
            prometheus_handle,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.shared.policy
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    /// Public path of a resource, including the configured API prefix.
    #[must_use]
    pub fn resource_path(&self, path: &str) -> String {
        format!("{}{}", api_prefix(self.config()), path)
    }
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(Arc::new(AppState::new(shared, prometheus_handle)))
}

/// Normalised API prefix: empty, or `/segment` without a trailing slash.
fn api_prefix(config: &Config) -> String {
    let trimmed = config.server.api_prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// 201 with a `Location` header and a JSON body.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

async fn not_found() -> ApiError {
    ApiError::NotFound("The requested URL was not found on the server".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub fn router(state: Arc<AppState>) -> Router {
    let prefix = api_prefix(state.config());
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = create_resource_router().method_not_allowed_fallback(method_not_allowed);

    let app = if prefix.is_empty() {
        Router::new().merge(api_router)
    } else {
        Router::new().nest(&prefix, api_router)
    };

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    app.route("/health", get(observability::get_health))
        .route("/metrics", get(observability::get_metrics))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
}

fn create_resource_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/categories/{id}/items",
            get(categories::list_category_items).post(categories::create_item),
        )
        .route("/items", get(items::list_items))
        .route(
            "/items/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/users", get(users::list_users).post(users::register))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
