// Bulk creation HTTP routes
//
// Both endpoints accept {"count": N} and answer 200 with a summary even
// when individual rows failed; only malformed input gets a 4xx and only a
// systemic failure gets a 5xx.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use roster_core::BatchExecutor;
use roster_storage::PersonStore;

use crate::common::{ApiError, ErrorBody};
use crate::services::{BulkService, BulkSummary};

/// Request for the bulk creation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkCreateRequest {
    /// Number of records to create.
    #[schema(example = 100)]
    pub count: i64,
}

/// Summary of one bulk creation call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkCreateResponse {
    /// Number of records asked for.
    pub requested: usize,
    /// Number of records actually written.
    pub created: usize,
}

impl From<BulkSummary> for BulkCreateResponse {
    fn from(summary: BulkSummary) -> Self {
        Self {
            requested: summary.requested,
            created: summary.created,
        }
    }
}

/// App state for bulk routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BulkService>,
}

impl AppState {
    pub fn new(store: Arc<PersonStore>, executor: Arc<BatchExecutor>) -> Self {
        Self {
            service: Arc::new(BulkService::new(store, executor)),
        }
    }
}

/// Create bulk routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/persons/bulk", post(bulk_create))
        .route("/v1/persons/bulk-batched", post(bulk_create_batched))
        .with_state(state)
}

fn parse_count(
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<usize, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::invalid(e.body_text()))?;
    usize::try_from(req.count).map_err(|_| ApiError::invalid("count must be positive"))
}

/// POST /v1/persons/bulk - Create generated persons on the blocking pool
#[utoipa::path(
    post,
    path = "/v1/persons/bulk",
    request_body = BulkCreateRequest,
    responses(
        (status = 200, description = "Bulk insert summary", body = BulkCreateResponse),
        (status = 400, description = "Invalid count", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "bulk"
)]
pub async fn bulk_create(
    State(state): State<AppState>,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<Json<BulkCreateResponse>, ApiError> {
    let count = parse_count(payload)?;
    let summary = state.service.create_blocking(count).await?;
    Ok(Json(summary.into()))
}

/// POST /v1/persons/bulk-batched - Create generated persons in chunked writes
#[utoipa::path(
    post,
    path = "/v1/persons/bulk-batched",
    request_body = BulkCreateRequest,
    responses(
        (status = 200, description = "Bulk insert summary", body = BulkCreateResponse),
        (status = 400, description = "Invalid count", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "bulk"
)]
pub async fn bulk_create_batched(
    State(state): State<AppState>,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<Json<BulkCreateResponse>, ApiError> {
    let count = parse_count(payload)?;
    let summary = state.service.create_batched(count).await?;
    Ok(Json(summary.into()))
}
