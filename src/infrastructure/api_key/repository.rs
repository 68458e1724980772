//! In-memory API key repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::api_key::{ApiKey, ApiKeyRepository};
use crate::domain::DomainError;

use super::demo::demo_keys;
use super::generator::ApiKeyGenerator;

/// In-memory implementation of ApiKeyRepository
///
/// Demo keys live in an immutable map consulted first; issued keys sit
/// behind a lock so inserts are atomic with respect to lookups.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    demo_keys: HashMap<String, ApiKey>,
    keys: RwLock<HashMap<String, ApiKey>>,
}

impl InMemoryApiKeyRepository {
    /// Create an empty repository without demo keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with the published demo keys
    ///
    /// Called once at process start.
    pub fn initialize(generator: &ApiKeyGenerator) -> Self {
        Self::with_demo_keys(demo_keys(generator, Utc::now()))
    }

    /// Create a repository with a fixed set of permanent keys
    pub fn with_demo_keys(keys: Vec<ApiKey>) -> Self {
        let demo_keys = keys
            .into_iter()
            .map(|k| (k.key_id().to_string(), k))
            .collect();

        Self {
            demo_keys,
            keys: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, key_id: &str) -> Option<ApiKey> {
        if let Some(key) = self.demo_keys.get(key_id) {
            return Some(key.clone());
        }

        let keys = self.keys.read().await;
        keys.get(key_id).cloned()
    }

    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let key_id = api_key.key_id().to_string();

        if self.demo_keys.contains_key(&key_id) {
            return Err(DomainError::conflict("API key collides with a demo key"));
        }

        let mut keys = self.keys.write().await;

        if keys.contains_key(&key_id) {
            return Err(DomainError::conflict("API key already exists"));
        }

        debug!(key_prefix = %api_key.key_prefix(), "Storing API key");
        keys.insert(key_id, api_key.clone());

        Ok(api_key)
    }

    async fn count(&self) -> usize {
        self.demo_keys.len() + self.keys.read().await.len()
    }
}
