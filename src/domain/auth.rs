//! Authentication outcomes

use super::api_key::ApiKey;

/// Outcome of optional authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// No credential was presented; the caller proceeds as a public client
    Anonymous,
    /// A credential was presented and resolved
    Authenticated(ApiKey),
}

impl AuthResult {
    pub fn identity(&self) -> Option<&ApiKey> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(key) => Some(key),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Tier label reported to clients, `public` for anonymous callers
    pub fn tier_label(&self) -> &'static str {
        match self {
            Self::Anonymous => "public",
            Self::Authenticated(key) => key.tier().as_str(),
        }
    }
}
