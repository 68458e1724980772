//! Infrastructure layer - External service implementations

pub mod api_key;
pub mod auth;
pub mod clock;
pub mod logging;
pub mod observability;
pub mod weather;
