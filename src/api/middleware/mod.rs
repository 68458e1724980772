//! API middleware components

pub mod auth;
pub mod client;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security;

pub use auth::{OptionalApiKey, RequireApiKey, API_KEY_HEADER};
pub use client::ClientAddr;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::{throttle_address, throttle_caller, throttle_key, RateLimitHeaders};
pub use security::security_headers_middleware;
