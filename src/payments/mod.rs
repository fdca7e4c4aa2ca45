//! Mobile-money payment routing
//!
//! Presents one collect/disburse interface to the rest of the application and
//! routes each request across the configured providers (A to D), falling back
//! in priority order when a provider is unreachable or misconfigured.

pub mod credentials;
pub mod engine;
pub mod error;
pub mod providers;
pub mod reference;
pub mod registry;
pub mod traits;
pub mod types;
pub mod validation;

pub use engine::{ProviderReadiness, RoutingEngine};
pub use error::{ProviderError, ProviderResult, RegistryError};
pub use registry::{ProviderRegistry, RegistryEntry, RoutingPolicy};
pub use traits::PaymentAdapter;
pub use types::{
    CanonicalResult, Country, Direction, Gateway, Operator, PaymentRequest, TransactionStatus,
};
