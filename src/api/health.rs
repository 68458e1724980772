//! Health check endpoints

use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;
use crate::domain::api_key::Tier;
use crate::domain::weather::MODEL_LABEL;

pub const SERVICE_NAME: &str = "NeuralGCM Weather API";

/// Health response with the published pricing table
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    pub model: &'static str,
    pub pricing: Pricing,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Serialize)]
pub struct Pricing {
    pub free: String,
    pub starter: String,
    pub pro: String,
    pub enterprise: String,
}

impl Pricing {
    fn published() -> Self {
        Self {
            free: format!("{} req/min - $0", Tier::Free.requests_per_minute()),
            starter: format!("{} req/min - $29/mo", Tier::Starter.requests_per_minute()),
            pro: format!("{} req/min - $99/mo", Tier::Pro.requests_per_minute()),
            enterprise: format!("{} req/min - $499/mo", Tier::Enterprise.requests_per_minute()),
        }
    }
}

/// Service status, version and pricing
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        model: MODEL_LABEL,
        pricing: Pricing::published(),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
