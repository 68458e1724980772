//! API layer - HTTP endpoints and middleware

pub mod frontend;
pub mod health;
pub mod keys;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod weather;

pub use middleware::{OptionalApiKey, RequireApiKey};
pub use router::create_router;
pub use state::AppState;
