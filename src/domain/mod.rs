//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod auth;
pub mod error;
pub mod weather;

pub use api_key::{ApiKey, ApiKeyInfo, ApiKeyRepository, IssuedApiKey, Tier};
pub use auth::AuthResult;
pub use error::{AuthError, DomainError};
pub use weather::{Coordinates, Forecast, WeatherProvider};
