// Roster API server
// Concurrency demo over a Person roster: pool-offloaded bulk inserts,
// chunked writes through a thread hop, and cooperative HTTP fan-out.

mod bulk;
mod common;
mod config;
mod fanout;
mod persons;
mod services;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use roster_core::BatchExecutor;
use roster_storage::PersonStore;

use crate::common::{ErrorBody, ListResponse};
use crate::config::ServerConfig;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        persons::create_person,
        persons::list_persons,
        persons::get_person,
        persons::update_person,
        persons::delete_person,
        bulk::bulk_create,
        bulk::bulk_create_batched,
        fanout::fanout_fetch,
    ),
    components(
        schemas(
            persons::Person,
            persons::CreatePersonRequest,
            persons::UpdatePersonRequest,
            bulk::BulkCreateRequest,
            bulk::BulkCreateResponse,
            fanout::FanoutResponse,
            services::FetchEntry,
            ListResponse<persons::Person>,
            ErrorBody,
        )
    ),
    tags(
        (name = "persons", description = "Person CRUD endpoints"),
        (name = "bulk", description = "Concurrent bulk creation endpoints"),
        (name = "fetch", description = "Outbound fan-out endpoints")
    ),
    info(
        title = "Roster API",
        version = "0.1.0",
        description = "Person roster with bounded-concurrency bulk operations",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("roster-api starting...");

    let config = ServerConfig::from_env();
    tracing::info!(
        max_batch = config.batch.max_batch_size,
        concurrency = config.batch.concurrency,
        write_chunk = config.batch.write_chunk_size,
        timeout_secs = config.batch.item_timeout.as_secs(),
        "Batch executor configured"
    );

    // Open the store
    let store = match &config.db_path {
        Some(path) => PersonStore::open(path)
            .with_context(|| format!("failed to open database at {path}"))?,
        None => {
            tracing::warn!("ROSTER_DB not set, using an in-memory database");
            PersonStore::open_in_memory()?
        }
    };
    let store = Arc::new(store);
    let executor = Arc::new(BatchExecutor::new(config.batch.clone()));

    // Create module-specific states
    let persons_state = persons::AppState::new(store.clone());
    let bulk_state = bulk::AppState::new(store.clone(), executor.clone());
    let fanout_state = fanout::AppState::new(config.fanout_targets.clone(), executor.clone());

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(persons::routes(persons_state))
        .merge(bulk::routes(bulk_state))
        .merge(fanout::routes(fanout_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().route("/health", get(health));
    app = app.merge(build_router_with_prefix(api_routes, &config.api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if cors_origins.is_empty() {
        app
    } else {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("Listening on {}", config.addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
