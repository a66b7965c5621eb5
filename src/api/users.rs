use axum::{Json, extract::State, http::StatusCode, response::Response};
use std::sync::Arc;

use super::validation::{JsonBody, ResourceId, ValidatedJson, required, validate_username};
use super::{
    ApiError, AppState, NewUserRequest, RegisteredUser, TokenResponse, UpdateUserRequest, UserDto,
    UserList, created,
};
use crate::services::{Action, Identity};

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("password cannot be empty"));
    }
    Ok(())
}

/// GET /users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UserList>, ApiError> {
    let users = state.users().list_users().await?;

    Ok(Json(UserList {
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<UserDto>, ApiError> {
    let user = state.users().get_user(id).await?;
    Ok(Json(user.into()))
}

/// POST /users
///
/// Self-registration. Responds with the new id and a token for it.
pub async fn register(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    body: JsonBody<NewUserRequest>,
) -> Result<Response, ApiError> {
    state.policy().authorize(&identity, Action::CreateUser)?;
    let ValidatedJson(payload) = body?;

    let username = required(payload.username, "user", "username")?;
    let password = required(payload.password, "user", "password")?;
    validate_username(&username)?;
    validate_password(&password)?;

    let registered = state.users().register(&username, &password).await?;

    let location = state.resource_path(&format!("/users/{}", registered.user.id));
    Ok(created(
        location,
        RegisteredUser {
            id: registered.user.id,
            token: registered.token,
        },
    ))
}

/// PUT /users/{id}
///
/// Only the account owner or the administrator may change a user. Responds
/// with a fresh token; earlier tokens stay valid until they expire.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    identity: Identity,
    body: JsonBody<UpdateUserRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let policy = state.policy();
    policy.require_authenticated(&identity)?;

    let target = state.users().get_user(id).await?;
    policy.authorize(
        &identity,
        Action::ModifyUser {
            owner: &target.username,
        },
    )?;
    let ValidatedJson(payload) = body?;

    if let Some(username) = payload.username.as_deref() {
        validate_username(username)?;
    }
    if let Some(password) = payload.password.as_deref() {
        validate_password(password)?;
    }

    let updated = state
        .users()
        .update_user(id, payload.username.as_deref(), payload.password.as_deref())
        .await?;

    Ok(Json(TokenResponse {
        token: updated.token,
    }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    identity: Identity,
) -> Result<StatusCode, ApiError> {
    let policy = state.policy();
    policy.require_authenticated(&identity)?;

    let target = state.users().get_user(id).await?;
    policy.authorize(
        &identity,
        Action::ModifyUser {
            owner: &target.username,
        },
    )?;

    state.users().delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
