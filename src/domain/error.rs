use thiserror::Error;

/// Authentication and admission failures surfaced to the route layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was presented where one is required
    #[error("API key required")]
    MissingKey,

    /// A credential was presented but does not resolve to any key
    #[error("Invalid API key")]
    InvalidKey,

    /// The caller is over its quota for the current window
    #[error("Rate limit exceeded: {limit} requests per minute, retry in {retry_after_secs}s")]
    RateLimitExceeded { limit: u32, retry_after_secs: u64 },
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Entropy unavailable: {message}")]
    EntropyUnavailable { message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn entropy_unavailable(message: impl Into<String>) -> Self {
        Self::EntropyUnavailable {
            message: message.into(),
        }
    }
}
