//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service level of a key, each mapped to a fixed requests-per-minute quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    #[default]
    Free,
    Starter,
    Pro,
    Enterprise,
    DemoFree,
    DemoPro,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::Free,
        Tier::Starter,
        Tier::Pro,
        Tier::Enterprise,
        Tier::DemoFree,
        Tier::DemoPro,
    ];

    /// Requests per minute allowed for this tier
    pub fn requests_per_minute(&self) -> u32 {
        match self {
            Self::Free => 10,
            Self::Starter => 60,
            Self::Pro => 300,
            Self::Enterprise => 1000,
            Self::DemoFree => 10,
            Self::DemoPro => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
            Self::DemoFree => "demo-free",
            Self::DemoPro => "demo-pro",
        }
    }

    /// Look up a tier by its exact name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == name)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API Key entity
///
/// The plaintext secret is never held here: keys are indexed by a hash of the
/// secret, which also serves as the identity the rate limiter partitions on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Hash of the secret, the lookup identity
    key_id: String,
    /// Recognizable leading characters of the secret, safe to log
    key_prefix: String,
    /// Display label
    owner_name: String,
    tier: Tier,
    /// Fixed at creation from the tier
    requests_per_minute: u32,
    created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new API key record, deriving its limit from the tier
    pub fn new(
        key_id: impl Into<String>,
        key_prefix: impl Into<String>,
        owner_name: impl Into<String>,
        tier: Tier,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            key_prefix: key_prefix.into(),
            owner_name: owner_name.into(),
            tier,
            requests_per_minute: tier.requests_per_minute(),
            created_at: Utc::now(),
        }
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Read-only metadata view, safe to return to the key's holder
    pub fn info(&self) -> ApiKeyInfo {
        ApiKeyInfo {
            name: self.owner_name.clone(),
            key_prefix: self.key_prefix.clone(),
            tier: self.tier,
            rate_limit: self.requests_per_minute,
            created: self.created_at,
        }
    }
}

/// Metadata of a key without any secret material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub name: String,
    pub key_prefix: String,
    pub tier: Tier,
    /// Requests per minute
    pub rate_limit: u32,
    pub created: DateTime<Utc>,
}

/// A freshly issued key together with its plaintext secret
///
/// This is the only value that ever carries the secret.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub secret: String,
    pub api_key: ApiKey,
}
