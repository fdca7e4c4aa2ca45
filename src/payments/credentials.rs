//! Credential resolution for provider adapters
//!
//! Adapters declare the settings they need; a missing or blank value is a
//! configuration fault for that provider only.

use crate::payments::error::{ProviderError, ProviderResult};
use crate::payments::types::Gateway;
use std::fmt;

/// Secret value whose `Debug` output never reveals the contents
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Check that every named setting has a non-blank value
///
/// The error lists all missing settings by their environment variable name.
pub fn require(provider: Gateway, settings: &[(&'static str, &str)]) -> ProviderResult<()> {
    let missing: Vec<&str> = settings
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::configuration(
            provider,
            format!("missing {}", missing.join(", ")),
        ))
    }
}
