//! NeuralGCM Weather API gateway
//!
//! A public weather API with:
//! - API key issuance and authentication (demo keys included)
//! - Per-caller sliding-window rate limiting by tier
//! - Forecast, precipitation and extreme-event endpoints backed by Open-Meteo

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    api_key::{ApiKeyService, KeyStore, RateLimiter},
    weather::{HttpClient, OpenMeteoProvider, WeatherService},
};
use tracing::info;

/// Create the application state with default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let key_store: Arc<dyn KeyStore> = Arc::new(ApiKeyService::initialize());

    let rate_limiter =
        Arc::new(RateLimiter::new().with_cleanup_interval(config.rate_limit.sweep_interval()));

    let client = HttpClient::with_timeout(config.weather.timeout())?;
    let provider = OpenMeteoProvider::new(Arc::new(client)).with_base_url(&config.weather.base_url);
    info!(base_url = %config.weather.base_url, "Weather provider configured");

    let state = AppState::new(key_store, rate_limiter, WeatherService::new(Arc::new(provider)))
        .with_route_limits(config.rate_limit.clone())
        .with_static_dir(&config.static_dir)
        .with_trust_forwarded_for(config.server.trust_forwarded_for);

    Ok(state)
}
