//! HTTP surface for the routing engine
//!
//! Collect/disburse endpoints for the application layer and the registry
//! toggle used by operators.

pub mod health;
pub mod payments;
pub mod providers;

use crate::payments::RoutingEngine;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RoutingEngine>,
    pub environment: String,
}

impl AppState {
    pub fn new(engine: Arc<RoutingEngine>, environment: impl Into<String>) -> Self {
        Self {
            engine,
            environment: environment.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/payments/collect", post(payments::collect))
        .route("/api/v1/payments/disburse", post(payments::disburse))
        .route("/api/v1/providers", get(providers::list_providers))
        .route("/api/v1/providers/:name", put(providers::set_provider_enabled))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
