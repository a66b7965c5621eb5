mod common;

use axum::http::StatusCode;
use catalog::services::TokenCodec;
use common::{API, TEST_SECRET, assert_unauthorized, basic, bearer, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_anonymous_can_read_but_not_write() {
    let app = spawn_app().await;
    app.register("writer", "pw").await;
    let category = app.create_category(&basic("writer", "pw"), "Baseball").await;
    let item = app
        .create_item(&basic("writer", "pw"), category, "Bat")
        .await;

    for path in [
        "/categories".to_string(),
        format!("/categories/{category}"),
        format!("/categories/{category}/items"),
        "/items".to_string(),
        format!("/items/{item}"),
        "/users".to_string(),
    ] {
        assert_eq!(app.get(&path).await.status, StatusCode::OK, "GET {path}");
    }

    let writes = [
        ("POST", format!("{API}/categories"), Some(json!({ "name": "Soccer" }))),
        ("PUT", format!("{API}/categories/{category}"), Some(json!({ "name": "X" }))),
        ("DELETE", format!("{API}/categories/{category}"), None),
        (
            "POST",
            format!("{API}/categories/{category}/items"),
            Some(json!({ "title": "Ball", "description": "x" })),
        ),
        ("PUT", format!("{API}/items/{item}"), Some(json!({ "title": "Y" }))),
        ("DELETE", format!("{API}/items/{item}"), None),
    ];

    for (method, path, body) in writes {
        let response = app.send(method, &path, None, body).await;
        assert_unauthorized(&response);
    }

    let response = app.get(&format!("/categories/{category}")).await;
    assert_eq!(response.body["name"], "Baseball");
}

#[tokio::test]
async fn test_any_authenticated_user_may_write_catalog() {
    let app = spawn_app().await;
    app.register("alice", "a-pw").await;
    let (_, bob_token) = app.register("bob", "b-pw").await;

    let category = app.create_category(&basic("alice", "a-pw"), "Chess").await;

    let response = app
        .send(
            "PUT",
            &format!("{API}/categories/{category}"),
            Some(&bearer(&bob_token)),
            Some(json!({ "name": "Checkers" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Checkers");
}

#[tokio::test]
async fn test_bad_credentials_are_rejected_on_writes_only() {
    let app = spawn_app().await;
    app.register("alice", "right").await;

    let body = || Some(json!({ "name": "Darts" }));

    let response = app
        .send("POST", &format!("{API}/categories"), Some(&basic("alice", "wrong")), body())
        .await;
    assert_unauthorized(&response);

    let response = app
        .send("POST", &format!("{API}/categories"), Some(&basic("nobody", "right")), body())
        .await;
    assert_unauthorized(&response);

    let response = app
        .send("POST", &format!("{API}/categories"), Some("Bearer not.a.token"), body())
        .await;
    assert_unauthorized(&response);

    let response = app
        .send("POST", &format!("{API}/categories"), Some("Basic %%%"), body())
        .await;
    assert_unauthorized(&response);

    let response = app
        .send("GET", &format!("{API}/categories"), Some(&basic("alice", "wrong")), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_accepted_in_basic_username_slot() {
    let app = spawn_app().await;
    let (_, token) = app.register("alice", "pw").await;

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&basic(&token, "")),
            Some(json!({ "name": "Rugby" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&basic(&token, "ignored")),
            Some(json!({ "name": "Polo" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_users_modify_only_themselves() {
    let app = spawn_app().await;
    let (alice_id, alice_token) = app.register("alice", "a-pw").await;
    let (bob_id, _) = app.register("bob", "b-pw").await;

    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{bob_id}"),
            Some(&bearer(&alice_token)),
            Some(json!({ "password": "hijacked" })),
        )
        .await;
    assert_unauthorized(&response);

    let response = app
        .send("DELETE", &format!("{API}/users/{bob_id}"), Some(&bearer(&alice_token)), None)
        .await;
    assert_unauthorized(&response);
    assert_eq!(app.get(&format!("/users/{bob_id}")).await.status, StatusCode::OK);

    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{alice_id}"),
            Some(&bearer(&alice_token)),
            Some(json!({ "username": "alicia" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["token"].is_string());

    let response = app.get(&format!("/users/{alice_id}")).await;
    assert_eq!(response.body, json!({ "id": alice_id, "username": "alicia" }));

    let response = app
        .send("DELETE", &format!("{API}/users/{alice_id}"), Some(&basic("alicia", "a-pw")), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.get(&format!("/users/{alice_id}")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_admin_can_modify_anyone() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = app.register("Admin", "root").await;
    let (bob_id, _) = app.register("bob", "b-pw").await;
    let (carol_id, _) = app.register("carol", "c-pw").await;

    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{bob_id}"),
            Some(&bearer(&admin_token)),
            Some(json!({ "password": "reset" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&basic("bob", "reset")),
            Some(json!({ "name": "Bowling" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send("DELETE", &format!("{API}/users/{carol_id}"), Some(&basic("Admin", "root")), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{admin_id}"),
            Some(&bearer(&admin_token)),
            Some(json!({ "password": "new-root" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send("DELETE", &format!("{API}/users/{admin_id}"), Some(&basic("Admin", "new-root")), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_admin_match_is_exact() {
    let app = spawn_app().await;
    let (_, token) = app.register("admin", "pw").await;
    let (bob_id, _) = app.register("bob", "b-pw").await;

    let response = app
        .send("DELETE", &format!("{API}/users/{bob_id}"), Some(&bearer(&token)), None)
        .await;
    assert_unauthorized(&response);
}

#[tokio::test]
async fn test_old_token_survives_password_change() {
    let app = spawn_app().await;

    let response = app
        .send(
            "POST",
            &format!("{API}/users"),
            None,
            Some(json!({ "username": "a", "password": "b" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_i64().unwrap();
    let old_token = response.body["token"].as_str().unwrap().to_string();
    assert_eq!(
        response.headers["location"].to_str().unwrap(),
        format!("{API}/users/{id}")
    );

    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{id}"),
            Some(&bearer(&old_token)),
            Some(json!({ "password": "c" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_token = response.body["token"].as_str().unwrap().to_string();

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&old_token)),
            Some(json!({ "name": "Old" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&new_token)),
            Some(json!({ "name": "New" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&basic("a", "b")),
            Some(json!({ "name": "Stale" })),
        )
        .await;
    assert_unauthorized(&response);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&basic("a", "c")),
            Some(json!({ "name": "Fresh" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_are_rejected() {
    let app = spawn_app().await;
    let (id, _) = app.register("alice", "pw").await;
    let id = i32::try_from(id).unwrap();

    let codec = TokenCodec::new(TEST_SECRET.as_bytes(), 3600);
    let now = chrono::Utc::now().timestamp();
    let expired = codec.issue_at(id, 3600, now - 3600).unwrap();

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&expired)),
            Some(json!({ "name": "Late" })),
        )
        .await;
    assert_unauthorized(&response);

    let foreign = TokenCodec::new(b"some other secret", 3600).issue(id).unwrap();
    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&foreign)),
            Some(json!({ "name": "Forged" })),
        )
        .await;
    assert_unauthorized(&response);

    let valid = codec.issue(id).unwrap();
    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&valid)),
            Some(json!({ "name": "OnTime" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_anonymous() {
    let app = spawn_app().await;
    let (id, token) = app.register("ghost", "pw").await;

    let response = app
        .send("DELETE", &format!("{API}/users/{id}"), Some(&bearer(&token)), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send("GET", &format!("{API}/categories"), Some(&bearer(&token)), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&token)),
            Some(json!({ "name": "Haunted" })),
        )
        .await;
    assert_unauthorized(&response);
}

#[tokio::test]
async fn test_user_checks_run_in_order() {
    let app = spawn_app().await;
    let (_, token) = app.register("alice", "pw").await;
    let (bob_id, _) = app.register("bob", "b-pw").await;

    // Authentication before lookup.
    let response = app
        .send("PUT", &format!("{API}/users/999"), None, Some(json!({ "password": "x" })))
        .await;
    assert_unauthorized(&response);

    // Lookup before ownership.
    let response = app
        .send(
            "PUT",
            &format!("{API}/users/999"),
            Some(&bearer(&token)),
            Some(json!({ "password": "x" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Ownership before validation.
    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{bob_id}"),
            Some(&bearer(&token)),
            Some(json!({ "username": "" })),
        )
        .await;
    assert_unauthorized(&response);
}

#[tokio::test]
async fn test_write_without_body_still_needs_authentication() {
    let app = spawn_app().await;
    let (alice_id, token) = app.register("alice", "pw").await;
    let category = app.create_category(&bearer(&token), "Golf").await;
    let item = app.create_item(&bearer(&token), category, "Tee").await;

    for (method, path) in [
        ("POST", format!("{API}/categories")),
        ("PUT", format!("{API}/categories/{category}")),
        ("POST", format!("{API}/categories/{category}/items")),
        ("PUT", format!("{API}/items/{item}")),
        ("PUT", format!("{API}/users/{alice_id}")),
    ] {
        let response = app.send(method, &path, None, None).await;
        assert_unauthorized(&response);

        let response = app
            .send_raw(method, &path, None, Some("application/json"), "{not json")
            .await;
        assert_unauthorized(&response);

        let response = app
            .send_raw(method, &path, Some("Basic %%%"), Some("text/plain"), "name=x")
            .await;
        assert_unauthorized(&response);
    }

    // Another user's record is still a 401, whatever the body.
    let (bob_id, _) = app.register("bob", "b-pw").await;
    let response = app
        .send("PUT", &format!("{API}/users/{bob_id}"), Some(&bearer(&token)), None)
        .await;
    assert_unauthorized(&response);

    // A missing record is still a 404.
    let response = app
        .send("PUT", &format!("{API}/items/999"), Some(&bearer(&token)), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authenticated_write_without_body_is_bad_request() {
    let app = spawn_app().await;
    let (alice_id, token) = app.register("alice", "pw").await;

    let response = app
        .send("POST", &format!("{API}/categories"), Some(&bearer(&token)), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );

    let response = app
        .send_raw(
            "PUT",
            &format!("{API}/users/{alice_id}"),
            Some(&bearer(&token)),
            Some("application/json"),
            "{not json",
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;

    let response = app
        .send("POST", &format!("{API}/users"), None, Some(json!({ "username": "solo" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid user: missing password");

    let response = app
        .send("POST", &format!("{API}/users"), None, Some(json!({ "password": "pw" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid user: missing username");

    app.register("taken", "pw").await;
    let response = app
        .send(
            "POST",
            &format!("{API}/users"),
            None,
            Some(json!({ "username": "taken", "password": "pw" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.get("/users").await;
    let users = response.body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_catalog_writes_can_require_token() {
    let (mut config, db_path) = common::test_config();
    config.security.catalog_writes_require_token = true;
    let app = common::spawn_app_with(config, db_path).await;

    let (id, token) = app.register("alice", "pw").await;

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&basic("alice", "pw")),
            Some(json!({ "name": "Squash" })),
        )
        .await;
    assert_unauthorized(&response);

    let response = app
        .send(
            "POST",
            &format!("{API}/categories"),
            Some(&bearer(&token)),
            Some(json!({ "name": "Squash" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    // User records still accept a password.
    let response = app
        .send(
            "PUT",
            &format!("{API}/users/{id}"),
            Some(&basic("alice", "pw")),
            Some(json!({ "password": "pw2" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
