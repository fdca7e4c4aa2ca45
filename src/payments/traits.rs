//! Payment adapter trait definitions
//!
//! Defines the capability every provider integration exposes to the routing engine.

use crate::payments::error::ProviderResult;
use crate::payments::types::{CanonicalResult, Direction, Gateway, PaymentRequest};
use async_trait::async_trait;

/// Trait for payment provider adapters
///
/// Adapters are built once at startup from configuration and shared for the
/// lifetime of the process. Adding a provider means adding an implementation
/// and a registry entry; the engine never matches on concrete providers.
#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    /// Registry key of the provider this adapter talks to
    fn gateway(&self) -> Gateway;

    /// Check that every secret and setting this adapter needs is present
    ///
    /// Called right before the adapter is attempted. An error here is a
    /// configuration fault: the engine logs it and moves on to the next provider.
    fn check_credentials(&self) -> ProviderResult<()>;

    /// Execute a collection or disbursement against the provider
    ///
    /// # Returns
    /// * `Ok(CanonicalResult)` - provider answered; this includes business declines,
    ///   which come back as `success: false` and are final
    /// * `Err(ProviderError)` - network error, non-2xx response, auth failure;
    ///   the engine falls back to the next provider
    async fn execute(
        &self,
        request: &PaymentRequest,
        direction: Direction,
    ) -> ProviderResult<CanonicalResult>;
}
