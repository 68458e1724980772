//! API key authentication gate

use std::sync::Arc;

use tracing::debug;

use crate::domain::api_key::ApiKey;
use crate::domain::{AuthError, AuthResult};
use crate::infrastructure::api_key::KeyStore;

/// Resolves the key a caller presented, for routes that require one and
/// routes where it is optional
#[derive(Clone)]
pub struct AuthGate {
    key_store: Arc<dyn KeyStore>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        Self { key_store }
    }

    /// Anonymous when no key was presented, an error when an unknown one was
    pub async fn authenticate_optional(
        &self,
        presented: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        match presented.filter(|key| !key.is_empty()) {
            None => Ok(AuthResult::Anonymous),
            Some(secret) => self.resolve(secret).await.map(AuthResult::Authenticated),
        }
    }

    /// A key must be presented and must resolve
    pub async fn authenticate_required(&self, presented: Option<&str>) -> Result<ApiKey, AuthError> {
        match presented.filter(|key| !key.is_empty()) {
            None => Err(AuthError::MissingKey),
            Some(secret) => self.resolve(secret).await,
        }
    }

    async fn resolve(&self, secret: &str) -> Result<ApiKey, AuthError> {
        match self.key_store.resolve(secret).await {
            Some(key) => Ok(key),
            None => {
                debug!("Presented API key did not resolve");
                Err(AuthError::InvalidKey)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::Tier;
    use crate::infrastructure::api_key::{
        ApiKeyService, InMemoryApiKeyRepository, DEMO_FREE_KEY, DEMO_PRO_KEY,
    };

    fn create_gate() -> (AuthGate, Arc<ApiKeyService<InMemoryApiKeyRepository>>) {
        let service = Arc::new(ApiKeyService::initialize());
        (AuthGate::new(service.clone()), service)
    }

    #[tokio::test]
    async fn test_optional_without_key_is_anonymous() {
        let (gate, _) = create_gate();

        assert_eq!(gate.authenticate_optional(None).await, Ok(AuthResult::Anonymous));
        assert_eq!(gate.authenticate_optional(Some("")).await, Ok(AuthResult::Anonymous));
    }

    #[tokio::test]
    async fn test_optional_with_demo_key() {
        let (gate, _) = create_gate();

        let result = gate.authenticate_optional(Some(DEMO_PRO_KEY)).await.unwrap();

        assert!(result.is_authenticated());
        assert_eq!(result.identity().unwrap().tier(), Tier::DemoPro);
        assert_eq!(result.identity().unwrap().requests_per_minute(), 100);
    }

    #[tokio::test]
    async fn test_optional_with_unknown_key_fails() {
        let (gate, _) = create_gate();

        let result = gate.authenticate_optional(Some("not-a-key")).await;

        assert_eq!(result, Err(AuthError::InvalidKey));
    }

    #[tokio::test]
    async fn test_required_without_key() {
        let (gate, _) = create_gate();

        assert_eq!(gate.authenticate_required(None).await, Err(AuthError::MissingKey));
        assert_eq!(gate.authenticate_required(Some("")).await, Err(AuthError::MissingKey));
    }

    #[tokio::test]
    async fn test_required_with_issued_key() {
        let (gate, service) = create_gate();
        let issued = service.issue("Acme", "starter").await.unwrap();

        let key = gate.authenticate_required(Some(&issued.secret)).await.unwrap();

        assert_eq!(key.key_id(), issued.api_key.key_id());
        assert_eq!(key.requests_per_minute(), 60);
    }

    #[tokio::test]
    async fn test_required_with_unknown_key() {
        let (gate, _) = create_gate();

        let result = gate.authenticate_required(Some("demo-free-key-2025")).await;
        assert_eq!(result, Err(AuthError::InvalidKey));

        let result = gate.authenticate_required(Some(DEMO_FREE_KEY)).await;
        assert!(result.is_ok());
    }
}
