//! Mobile-money deposit and withdrawal routing across multiple payment providers.

#[cfg(feature = "server")]
pub mod api;
pub mod config;
pub mod error;
pub mod payments;
