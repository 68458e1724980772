//! API Key domain
//!
//! Key records, service tiers and the repository trait backing key lookup.

mod entity;
mod repository;
mod validation;

pub use entity::{ApiKey, ApiKeyInfo, IssuedApiKey, Tier};
pub use repository::ApiKeyRepository;
#[cfg(test)]
pub use repository::MockApiKeyRepository;
pub use validation::{validate_owner_name, OwnerNameValidationError};
