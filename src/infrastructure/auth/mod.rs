//! Authentication infrastructure module
//!
//! This module turns a presented API key into an authentication outcome.

mod gate;

pub use gate::AuthGate;
