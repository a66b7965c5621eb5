use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::ApiError;
use crate::constants::limits::{
    MAX_CATEGORY_NAME_LEN, MAX_DESCRIPTION_LEN, MAX_ITEM_TITLE_LEN, MAX_USERNAME_LEN,
};

/// JSON body extractor that reports decode failures as 400 validation errors.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_to_error(&rejection)),
        }
    }
}

/// A body whose decode error is held back until the handler asks for it, so
/// authentication and lookup failures win over a bad body.
pub type JsonBody<T> = Result<ValidatedJson<T>, ApiError>;

fn json_rejection_to_error(rejection: &JsonRejection) -> ApiError {
    ApiError::validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Integer id taken from the last path segment. A segment that is not a
/// positive integer cannot name a record, so it is reported as 404.
pub struct ResourceId(pub i32);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => match raw.parse::<i32>() {
                Ok(id) if id > 0 => Ok(Self(id)),
                _ => Err(ApiError::NotFound(format!("{raw} not found"))),
            },
            Err(rejection) => Err(ApiError::internal(rejection.body_text())),
        }
    }
}

/// Unwraps a required body field, naming it in the error when absent.
pub fn required<T>(value: Option<T>, resource: &str, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("Invalid {resource}: missing {field}")))
}

fn validate_label<'a>(value: &'a str, field: &str, max_len: usize) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }

    if value.chars().count() > max_len {
        return Err(ApiError::validation(format!(
            "{field} must be {max_len} characters or less"
        )));
    }

    Ok(value)
}

pub fn validate_category_name(name: &str) -> Result<&str, ApiError> {
    validate_label(name, "name", MAX_CATEGORY_NAME_LEN)
}

pub fn validate_item_title(title: &str) -> Result<&str, ApiError> {
    validate_label(title, "title", MAX_ITEM_TITLE_LEN)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    validate_label(username, "username", MAX_USERNAME_LEN)
}

pub fn validate_description(description: &str) -> Result<&str, ApiError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::validation(format!(
            "description must be {MAX_DESCRIPTION_LEN} characters or less"
        )));
    }
    Ok(description)
}
