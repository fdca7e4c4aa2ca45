use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::error::AppResult;
use crate::payments::RegistryEntry;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub enabled: bool,
}

pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<RegistryEntry>> {
    Json(state.engine.provider_registry().await)
}

pub async fn set_provider_enabled(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(toggle): Json<ToggleRequest>,
) -> AppResult<Json<RegistryEntry>> {
    let entry = state
        .engine
        .set_provider_enabled(&name, toggle.enabled)
        .await?;
    Ok(Json(entry))
}
