//! API Key generation
//!
//! Generates cryptographically secure API keys and derives the hashed key id
//! they are stored under.

use std::fmt::Debug;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::DomainError;

/// Namespace marker every issued key starts with
pub const KEY_PREFIX: &str = "ngcm_";

/// Random bytes in a key (256 bits)
pub const KEY_BYTES: usize = 32;

/// Number of random characters kept in the visible prefix
const VISIBLE_CHARS: usize = 8;

/// Source of random bytes for key material
pub trait EntropySource: Send + Sync + Debug {
    fn fill(&self, dest: &mut [u8]) -> Result<(), DomainError>;
}

/// Operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), DomainError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| DomainError::entropy_unavailable(e.to_string()))
    }
}

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once at creation)
    pub key: String,
    /// The key prefix for identification
    pub prefix: String,
    /// The hashed key, used as storage and rate-limit identity
    pub key_id: String,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated keys
    prefix: String,
    entropy: Arc<dyn EntropySource>,
}

impl ApiKeyGenerator {
    /// Create a new API key generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entropy: Arc::new(OsEntropy),
        }
    }

    /// Create a generator for production keys
    pub fn production() -> Self {
        Self::new(KEY_PREFIX)
    }

    /// Use a different entropy source
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// Generate a new API key
    pub fn generate(&self) -> Result<GeneratedApiKey, DomainError> {
        let mut random_bytes = vec![0u8; KEY_BYTES];
        self.entropy.fill(&mut random_bytes)?;

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        let key = format!("{}{}", self.prefix, encoded);

        Ok(self.describe(key))
    }

    /// Describe a known secret (demo keys) without altering it
    pub fn from_secret(&self, secret: &str) -> GeneratedApiKey {
        self.describe(secret.to_string())
    }

    fn describe(&self, key: String) -> GeneratedApiKey {
        GeneratedApiKey {
            prefix: self.visible_prefix(&key),
            key_id: Self::hash_key(&key),
            key,
        }
    }

    /// The part of a key that is safe to display and log
    pub fn visible_prefix(&self, key: &str) -> String {
        let (head, rest) = match key.strip_prefix(self.prefix.as_str()) {
            Some(rest) => (self.prefix.as_str(), rest),
            None => ("", key),
        };

        format!("{}{}", head, rest.chars().take(VISIBLE_CHARS).collect::<String>())
    }

    /// Hash an API key into its key id
    pub fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let result = hasher.finalize();
        format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::production()
    }
}
