//! Route-level admission against the shared rate limiter

use std::convert::Infallible;

use axum::{
    http::HeaderValue,
    response::{IntoResponseParts, ResponseParts},
};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::ApiKey;
use crate::domain::{AuthError, AuthResult};
use crate::infrastructure::api_key::RateLimitResult;
use crate::infrastructure::observability::record_rate_limit_decision;

/// `X-RateLimit-*` headers for an admitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub limit: u32,
    pub remaining: u32,
}

impl From<&RateLimitResult> for RateLimitHeaders {
    fn from(result: &RateLimitResult) -> Self {
        Self {
            limit: result.limit,
            remaining: result.remaining,
        }
    }
}

impl IntoResponseParts for RateLimitHeaders {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let headers = res.headers_mut();
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        Ok(res)
    }
}

/// Throttle an authenticated caller by its own tier limit
///
/// The window is shared by every route the key calls.
pub async fn throttle_key(
    state: &AppState,
    route: &'static str,
    key: &ApiKey,
) -> Result<RateLimitHeaders, ApiError> {
    let result = state
        .rate_limiter
        .check_and_record(key.key_id(), key.requests_per_minute())
        .await;

    if !result.allowed {
        warn!(route, key_prefix = %key.key_prefix(), limit = result.limit, "Rate limit exceeded");
    }

    decide(route, result)
}

/// Throttle an anonymous caller by address with a per-route limit
pub async fn throttle_address(
    state: &AppState,
    route: &'static str,
    addr: &str,
    limit: u32,
) -> Result<RateLimitHeaders, ApiError> {
    let identity = format!("{}:{}", route, addr);
    let result = state.rate_limiter.check_and_record(&identity, limit).await;

    if !result.allowed {
        warn!(route, client = %addr, limit, "Rate limit exceeded");
    }

    decide(route, result)
}

/// Key limit for authenticated callers, address limit otherwise
pub async fn throttle_caller(
    state: &AppState,
    route: &'static str,
    auth: &AuthResult,
    addr: &str,
    anonymous_limit: u32,
) -> Result<RateLimitHeaders, ApiError> {
    match auth.identity() {
        Some(key) => throttle_key(state, route, key).await,
        None => throttle_address(state, route, addr, anonymous_limit).await,
    }
}

fn decide(route: &'static str, result: RateLimitResult) -> Result<RateLimitHeaders, ApiError> {
    record_rate_limit_decision(route, result.allowed);

    if result.allowed {
        return Ok(RateLimitHeaders::from(&result));
    }

    Err(AuthError::RateLimitExceeded {
        limit: result.limit,
        retry_after_secs: result.reset_in_seconds.max(1),
    }
    .into())
}
