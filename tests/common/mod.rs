#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use catalog::config::Config;
use http_body_util::BodyExt;
use std::path::PathBuf;
use tower::ServiceExt;

pub const API: &str = "/api/v1";
pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Config pointing at a fresh temp-file database, with cheap hashing.
pub fn test_config() -> (Config, PathBuf) {
    let db_path = std::env::temp_dir().join(format!("catalog-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.secret_key = Some(TEST_SECRET.to_string());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;

    (config, db_path)
}

pub async fn spawn_app() -> TestApp {
    let (config, db_path) = test_config();
    spawn_app_with(config, db_path).await
}

pub async fn spawn_app_with(config: Config, db_path: PathBuf) -> TestApp {
    let state = catalog::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: catalog::api::router(state),
        db_path,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        auth: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends `body` verbatim, with an optional content type.
    pub async fn send_raw(
        &self,
        method: &str,
        path: &str,
        auth: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send("GET", &format!("{API}{path}"), None, None).await
    }

    /// Registers a user and returns `(id, token)`.
    pub async fn register(&self, username: &str, password: &str) -> (i64, String) {
        let response = self
            .send(
                "POST",
                &format!("{API}/users"),
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        (
            response.body["id"].as_i64().unwrap(),
            response.body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Creates a category as `auth` and returns its id.
    pub async fn create_category(&self, auth: &str, name: &str) -> i64 {
        let response = self
            .send(
                "POST",
                &format!("{API}/categories"),
                Some(auth),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    pub async fn create_item(&self, auth: &str, category_id: i64, title: &str) -> i64 {
        let response = self
            .send(
                "POST",
                &format!("{API}/categories/{category_id}/items"),
                Some(auth),
                Some(serde_json::json!({ "title": title, "description": "x" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}

pub fn assert_unauthorized(response: &TestResponse) {
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        serde_json::json!({
            "status": 401,
            "error": "unauthorized",
            "message": "please authenticate"
        })
    );
}
