//! API Key repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::ApiKey;
use crate::domain::DomainError;

/// Storage for issued API keys, indexed by key id (the hash of the secret)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Exact-match lookup by key id; absence is not an error
    async fn get(&self, key_id: &str) -> Option<ApiKey>;

    /// Insert a new key, failing with a conflict if the id is already taken
    async fn insert(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Number of keys held, demo keys included
    async fn count(&self) -> usize;

    /// Check if a key id exists
    async fn exists(&self, key_id: &str) -> bool {
        self.get(key_id).await.is_some()
    }
}
