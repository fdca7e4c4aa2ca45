//! Payment provider implementations
//!
//! Concrete implementations of the PaymentAdapter trait, one per processor.

pub mod http;
pub mod provider_a;
pub mod provider_b;
pub mod provider_c;
pub mod provider_d;

pub use provider_a::{ProviderA, ProviderAConfig};
pub use provider_b::{ProviderB, ProviderBConfig};
pub use provider_c::{ProviderC, ProviderCConfig};
pub use provider_d::{ProviderD, ProviderDConfig};

use crate::payments::types::TransactionStatus;

/// How a provider's own status string maps onto the canonical model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusOutcome {
    Accepted(TransactionStatus),
    Declined,
}

/// Read a setting through `lookup`, falling back to `default` when unset
pub(crate) fn setting<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

pub(crate) fn timeout_setting<F>(lookup: &F, key: &str) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(http::DEFAULT_TIMEOUT_SECS)
}
