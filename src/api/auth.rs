use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::{Credentials, Identity};

/// The `Authorization` header was present but could not be read as either
/// scheme.
#[derive(Debug, PartialEq, Eq)]
pub struct MalformedCredentials;

/// Reads the credential slot of a request.
///
/// Accepts `Bearer <token>` and `Basic base64(username:password)`. Scheme
/// names are matched case-insensitively.
pub fn extract_credentials(
    headers: &HeaderMap,
) -> Result<Option<Credentials>, MalformedCredentials> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| MalformedCredentials)?.trim();
    let (scheme, rest) = value.split_once(' ').ok_or(MalformedCredentials)?;
    let rest = rest.trim();

    if scheme.eq_ignore_ascii_case("bearer") {
        if rest.is_empty() {
            return Err(MalformedCredentials);
        }
        return Ok(Some(Credentials::Bearer(rest.to_string())));
    }

    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = STANDARD.decode(rest).map_err(|_| MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| MalformedCredentials)?;
        let (username, password) = decoded.split_once(':').ok_or(MalformedCredentials)?;
        return Ok(Some(Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }));
    }

    Err(MalformedCredentials)
}

/// Resolves the caller for every handler that takes an [`Identity`].
///
/// Never rejects on bad credentials: those become [`Identity::Rejected`] and
/// the handler's policy check turns them into the uniform 401.
impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = match extract_credentials(&parts.headers) {
            Ok(credentials) => state
                .auth()
                .resolve(credentials)
                .await
                .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?,
            Err(MalformedCredentials) => {
                tracing::debug!("Malformed Authorization header");
                Identity::Rejected
            }
        };

        if let Some(username) = identity.username() {
            tracing::Span::current().record("user_id", username);
        }

        Ok(identity)
    }
}
