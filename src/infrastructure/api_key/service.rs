//! API Key service
//!
//! Issues keys and resolves presented secrets against the repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::api_key::{ApiKey, ApiKeyInfo, ApiKeyRepository, IssuedApiKey, Tier};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_key_issued;

use super::generator::ApiKeyGenerator;
use super::repository::InMemoryApiKeyRepository;

/// Attempts at drawing a fresh secret before giving up on a collision
const MAX_ISSUE_ATTEMPTS: usize = 3;

/// Key issuance and lookup, as seen by the route layer and the auth gate
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Issue a new key; unknown tier names fall back to `free`
    async fn issue(&self, owner_name: &str, tier: &str) -> Result<IssuedApiKey, DomainError>;

    /// Exact, byte-for-byte lookup of a presented secret
    async fn resolve(&self, secret: &str) -> Option<ApiKey>;

    /// Metadata of a key by id, without secret material
    async fn info(&self, key_id: &str) -> Option<ApiKeyInfo>;
}

/// API Key service for issuing and resolving keys
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: ApiKeyGenerator,
}

impl ApiKeyService<InMemoryApiKeyRepository> {
    /// Create the process-wide key store, seeded with the demo keys
    pub fn initialize() -> Self {
        let generator = ApiKeyGenerator::production();
        let repository = Arc::new(InMemoryApiKeyRepository::initialize(&generator));

        Self::new(repository).with_generator(generator)
    }
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new API key service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::production(),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Issue a new API key
    pub async fn issue(&self, owner_name: &str, tier: &str) -> Result<IssuedApiKey, DomainError> {
        let tier = Tier::parse(tier).unwrap_or_else(|| {
            debug!(requested = %tier, "Unknown tier, defaulting to free");
            Tier::Free
        });

        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let generated = self.generator.generate()?;
            let api_key = ApiKey::new(generated.key_id, &generated.prefix, owner_name, tier);

            match self.repository.insert(api_key).await {
                Ok(created) => {
                    info!(
                        key_prefix = %created.key_prefix(),
                        tier = %tier,
                        "API key issued"
                    );
                    record_key_issued(tier);

                    return Ok(IssuedApiKey {
                        secret: generated.key,
                        api_key: created,
                    });
                }
                Err(DomainError::Conflict { .. }) => {
                    warn!(attempt, "Generated API key collided, drawing again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::internal(
            "Could not generate a unique API key",
        ))
    }

    /// Resolve a presented secret
    pub async fn resolve(&self, secret: &str) -> Option<ApiKey> {
        let key_id = ApiKeyGenerator::hash_key(secret);
        self.repository.get(&key_id).await
    }

    /// Metadata of a key by id
    pub async fn info(&self, key_id: &str) -> Option<ApiKeyInfo> {
        self.repository.get(key_id).await.map(|key| key.info())
    }

    /// Number of keys currently held, demo keys included
    pub async fn count(&self) -> usize {
        self.repository.count().await
    }
}

#[async_trait]
impl<R: ApiKeyRepository + 'static> KeyStore for ApiKeyService<R> {
    async fn issue(&self, owner_name: &str, tier: &str) -> Result<IssuedApiKey, DomainError> {
        ApiKeyService::issue(self, owner_name, tier).await
    }

    async fn resolve(&self, secret: &str) -> Option<ApiKey> {
        ApiKeyService::resolve(self, secret).await
    }

    async fn info(&self, key_id: &str) -> Option<ApiKeyInfo> {
        ApiKeyService::info(self, key_id).await
    }
}
