//! Key registration and key metadata endpoints

use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{throttle_address, throttle_key, ClientAddr, RequireApiKey};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::api_key::{validate_owner_name, ApiKeyInfo, Tier};

#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub api_key: String,
    pub name: String,
    pub tier: Tier,
    pub rate_limit: u32,
    pub created: DateTime<Utc>,
    pub usage: &'static str,
    pub upgrade: &'static str,
}

#[derive(Debug, Serialize)]
pub struct KeyInfoResponse {
    pub success: bool,
    pub key_info: ApiKeyInfo,
}

/// POST /api/register?name= - issue a free-tier key
///
/// The secret appears in this response and nowhere else.
pub async fn register(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    Query(params): Query<RegisterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limits =
        throttle_address(&state, "register", &addr, Tier::Free.requests_per_minute()).await?;

    let name = params.name.unwrap_or_default();
    validate_owner_name(&name)
        .map_err(|e| ApiError::bad_request(e.to_string()).with_param("name"))?;

    let issued = state.key_store.issue(name.trim(), Tier::Free.as_str()).await?;
    let key = issued.api_key;

    let response = RegisterResponse {
        success: true,
        message: "API key created! Save it securely - it won't be shown again.",
        api_key: issued.secret,
        name: key.owner_name().to_string(),
        tier: key.tier(),
        rate_limit: key.requests_per_minute(),
        created: key.created_at(),
        usage: "Add header: X-API-Key: <your-key>",
        upgrade: "Contact us for higher rate limits",
    };

    Ok((limits, Json(response)))
}

/// GET /api/key-info - metadata of the presented key
pub async fn key_info(
    State(state): State<AppState>,
    RequireApiKey(key): RequireApiKey,
) -> Result<impl IntoResponse, ApiError> {
    let limits = throttle_key(&state, "key_info", &key).await?;

    let key_info = state
        .key_store
        .info(key.key_id())
        .await
        .ok_or_else(|| ApiError::not_found("API key not found"))?;

    Ok((
        limits,
        Json(KeyInfoResponse {
            success: true,
            key_info,
        }),
    ))
}
