use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::payments::ProviderReadiness;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub providers: Vec<ProviderHealth>,
}

#[derive(Serialize, Deserialize)]
pub struct ProviderHealth {
    pub name: String,
    pub enabled: bool,
    pub priority: u32,
    pub configured: bool,
}

impl From<ProviderReadiness> for ProviderHealth {
    fn from(readiness: ProviderReadiness) -> Self {
        Self {
            name: readiness.name.to_string(),
            enabled: readiness.enabled,
            priority: readiness.priority,
            configured: readiness.configured,
        }
    }
}

/// `healthy` while at least one enabled provider is fully configured
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers: Vec<ProviderHealth> = state
        .engine
        .provider_readiness()
        .await
        .into_iter()
        .map(ProviderHealth::from)
        .collect();

    let routable = providers.iter().any(|p| p.enabled && p.configured);

    Json(HealthResponse {
        status: if routable { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.clone(),
        providers,
    })
}
