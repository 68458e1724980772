//! API key authentication extractors

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::ApiKey;
use crate::domain::AuthResult;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that requires a valid API key
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub ApiKey);

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = presented_key(&parts.headers)?;

        let api_key = state.auth_gate.authenticate_required(presented).await?;
        debug!(key_prefix = %api_key.key_prefix(), "API key accepted");

        Ok(RequireApiKey(api_key))
    }
}

/// Extractor for routes open to anonymous callers
///
/// A key that is presented must still be valid.
#[derive(Debug, Clone)]
pub struct OptionalApiKey(pub AuthResult);

impl FromRequestParts<AppState> for OptionalApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = presented_key(&parts.headers)?;
        let result = state.auth_gate.authenticate_optional(presented).await?;

        Ok(OptionalApiKey(result))
    }
}

/// The raw header value, compared byte-for-byte downstream
fn presented_key(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    match headers.get(API_KEY_HEADER) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding")),
    }
}
