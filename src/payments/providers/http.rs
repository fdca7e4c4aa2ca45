//! Shared HTTP plumbing for provider adapters
//!
//! Sends a prepared request and turns everything short of a readable 2xx
//! JSON body into a transport fault.

use crate::payments::error::{ProviderError, ProviderResult};
use crate::payments::types::Gateway;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Build the HTTP client an adapter keeps for the lifetime of the process
pub fn build_client(provider: Gateway, timeout_secs: u64) -> ProviderResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("opay-payments/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            ProviderError::configuration(provider, format!("failed to create HTTP client: {}", e))
        })
}

/// Send a request and decode its JSON body
pub async fn send_json<T>(provider: Gateway, request: RequestBuilder) -> ProviderResult<T>
where
    T: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    if !status.is_success() {
        error!(provider = %provider, status = status.as_u16(), "Provider returned an error status");
        return Err(ProviderError::transport(
            provider,
            format!("HTTP {}: {}", status.as_u16(), truncate(&body, 200)),
        ));
    }

    debug!(provider = %provider, status = status.as_u16(), "Provider response received");

    serde_json::from_str::<T>(&body).map_err(|e| {
        error!(provider = %provider, "Failed to parse provider response: {}", e);
        ProviderError::transport(provider, format!("Invalid response format: {}", e))
    })
}

/// Join a base URL and an endpoint path without doubling the slash
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Provider identifiers arrive as strings or numbers depending on the provider
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
