//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::RateLimitConfig;
use crate::infrastructure::api_key::{KeyStore, RateLimiter};
use crate::infrastructure::auth::AuthGate;
use crate::infrastructure::weather::WeatherService;

/// Application state shared by every handler
///
/// One key store and one rate limiter serve the whole process.
#[derive(Clone)]
pub struct AppState {
    pub key_store: Arc<dyn KeyStore>,
    pub auth_gate: AuthGate,
    pub rate_limiter: Arc<RateLimiter>,
    pub weather_service: WeatherService,
    pub route_limits: RateLimitConfig,
    pub static_dir: Arc<PathBuf>,
    /// Take the client address from `X-Forwarded-For` instead of the peer
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        key_store: Arc<dyn KeyStore>,
        rate_limiter: Arc<RateLimiter>,
        weather_service: WeatherService,
    ) -> Self {
        Self {
            auth_gate: AuthGate::new(key_store.clone()),
            key_store,
            rate_limiter,
            weather_service,
            route_limits: RateLimitConfig::default(),
            static_dir: Arc::new(PathBuf::from("static")),
            trust_forwarded_for: false,
        }
    }

    pub fn with_route_limits(mut self, route_limits: RateLimitConfig) -> Self {
        self.route_limits = route_limits;
        self
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Arc::new(static_dir.into());
        self
    }

    /// Only enable behind a reverse proxy that overwrites the header
    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth_gate", &self.auth_gate)
            .field("weather_service", &self.weather_service)
            .field("route_limits", &self.route_limits)
            .field("static_dir", &self.static_dir)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish_non_exhaustive()
    }
}
