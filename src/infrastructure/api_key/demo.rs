//! Pre-seeded demo keys
//!
//! These secrets are published in the API documentation so anyone can try the
//! gateway without registering. They exist for the whole process lifetime.

use chrono::{DateTime, Utc};

use crate::domain::api_key::{ApiKey, Tier};

use super::generator::ApiKeyGenerator;

pub const DEMO_FREE_KEY: &str = "demo-free-key-2026";
pub const DEMO_PRO_KEY: &str = "demo-pro-key-2026";

/// Build the demo key records, all stamped with the same creation time
pub fn demo_keys(generator: &ApiKeyGenerator, created_at: DateTime<Utc>) -> Vec<ApiKey> {
    [
        (DEMO_FREE_KEY, "Demo Free User", Tier::DemoFree),
        (DEMO_PRO_KEY, "Demo Pro User", Tier::DemoPro),
    ]
    .into_iter()
    .map(|(secret, owner, tier)| {
        let described = generator.from_secret(secret);
        ApiKey::new(described.key_id, described.prefix, owner, tier).with_created_at(created_at)
    })
    .collect()
}
