use crate::payments::types::Gateway;
use std::time::Duration;
use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Faults raised by a provider adapter
///
/// Every variant is a fallback trigger. Business declines are not errors:
/// adapters return them as a failed `CanonicalResult` instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Required secret or setting is missing for this provider
    #[error("{provider}: not configured ({message})")]
    Configuration { provider: Gateway, message: String },

    /// Network error, non-2xx response, auth failure or unreadable body
    #[error("{provider}: {message}")]
    Transport { provider: Gateway, message: String },

    #[error("{provider}: timed out after {elapsed:?}")]
    Timeout { provider: Gateway, elapsed: Duration },
}

impl ProviderError {
    pub fn configuration(provider: Gateway, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    pub fn transport(provider: Gateway, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            message: message.into(),
        }
    }

    pub fn timeout(provider: Gateway, elapsed: Duration) -> Self {
        Self::Timeout { provider, elapsed }
    }

    pub fn provider(&self) -> Gateway {
        match self {
            Self::Configuration { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Timeout { provider, .. } => *provider,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Short label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
        }
    }

    pub(crate) fn from_reqwest(provider: Gateway, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(provider, format!("request timed out: {}", err))
        } else if err.is_connect() {
            Self::transport(provider, format!("connection failed: {}", err))
        } else {
            Self::transport(provider, format!("request error: {}", err))
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown payment provider: {0}")]
    UnknownProvider(String),
}
