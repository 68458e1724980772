//! API Key infrastructure implementations
//!
//! This module provides implementations for API key generation,
//! storage, resolution, and rate limiting.

mod demo;
mod generator;
mod rate_limiter;
mod repository;
mod service;

pub use demo::{demo_keys, DEMO_FREE_KEY, DEMO_PRO_KEY};
pub use generator::{ApiKeyGenerator, EntropySource, GeneratedApiKey, OsEntropy, KEY_PREFIX};
pub use rate_limiter::{RateLimitResult, RateLimiter, DEFAULT_CLEANUP_INTERVAL, WINDOW};
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, KeyStore};

#[cfg(test)]
pub use generator::mock::FailingEntropy;
