use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tokio_util::sync::CancellationToken;

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::payments::{CanonicalResult, Direction, PaymentRequest};

pub async fn collect(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> AppResult<Json<CanonicalResult>> {
    let Json(request) = payload?;
    route_detached(state, request, Direction::Collect).await.map(Json)
}

pub async fn disburse(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> AppResult<Json<CanonicalResult>> {
    let Json(request) = payload?;
    route_detached(state, request, Direction::Disburse).await.map(Json)
}

/// Run the engine on its own task so a dropped connection cannot abort a
/// provider call mid-flight. The drop guard cancels the token when this
/// handler goes away, which stops the engine before its next fallback attempt.
async fn route_detached(
    state: AppState,
    request: PaymentRequest,
    direction: Direction,
) -> AppResult<CanonicalResult> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let engine = state.engine.clone();

    let task = tokio::spawn(async move {
        match direction {
            Direction::Collect => engine.collect_with_cancellation(request, &cancel).await,
            Direction::Disburse => engine.disburse_with_cancellation(request, &cancel).await,
        }
    });

    task.await
        .map_err(|e| AppError::Internal(format!("payment task failed: {}", e)))
}
