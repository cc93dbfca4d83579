// Outbound fan-out HTTP route
//
// Always answers 200 with one entry per target; individual failures are
// embedded in their entries, not raised.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use roster_core::BatchExecutor;

use crate::common::{ApiError, ErrorBody};
use crate::services::{FetchEntry, FetchService};

/// Aggregate fan-out response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FanoutResponse {
    /// One entry per configured target, in target order.
    pub results: Vec<FetchEntry>,
}

/// App state for fan-out routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FetchService>,
}

impl AppState {
    pub fn new(targets: Vec<String>, executor: Arc<BatchExecutor>) -> Self {
        Self {
            service: Arc::new(FetchService::new(targets, executor)),
        }
    }
}

/// Create fan-out routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/fetch/fanout", get(fanout_fetch))
        .with_state(state)
}

/// GET /v1/fetch/fanout - Fetch every configured target concurrently
#[utoipa::path(
    get,
    path = "/v1/fetch/fanout",
    responses(
        (status = 200, description = "Per-target outcomes", body = FanoutResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "fetch"
)]
pub async fn fanout_fetch(
    State(state): State<AppState>,
) -> Result<Json<FanoutResponse>, ApiError> {
    let results = state.service.fanout().await?;
    Ok(Json(FanoutResponse { results }))
}
