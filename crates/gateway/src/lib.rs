//! HTTP API gateway for BauBot.
//!
//! Exposes the query-answering and case-closing endpoints plus a health
//! check. Built on Axum; request concurrency comes entirely from the
//! server — every handler invocation is stateless and independent.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use baubot_answer::{AnswerPipeline, ChatClient};
use baubot_cases::{FeedbackCloser, FileCaseStore};
use baubot_retrieval::SearchClient;

/// Shared application state for the gateway.
pub struct GatewayState {
    /// The query-answering pipeline, present when search and generation
    /// are fully configured.
    pub pipeline: Option<Arc<AnswerPipeline>>,

    /// Why `pipeline` is `None`: the operator-facing names of the missing
    /// settings. Returned in 500 payloads so misconfiguration is
    /// diagnosable from the client side.
    pub missing_settings: Vec<String>,

    pub closer: Arc<FeedbackCloser>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the gateway state from configuration.
///
/// A misconfigured index or generator does not prevent startup: the
/// query endpoint answers 500 (listing what is missing) until the
/// settings are provided, while case closing keeps working.
pub fn build_state(config: &baubot_config::AppConfig) -> GatewayState {
    let mut missing = config.missing_search_settings();
    missing.extend(config.missing_generation_settings());

    let pipeline = if missing.is_empty() {
        SearchClient::from_config(config)
            .ok()
            .zip(ChatClient::from_config(config).ok())
            .map(|(index, chat)| {
                Arc::new(
                    AnswerPipeline::new(Arc::new(index), Arc::new(chat))
                        .with_top_k(config.search.top_k),
                )
            })
    } else {
        warn!(?missing, "Query answering disabled until settings are provided");
        None
    };

    let store = Arc::new(FileCaseStore::from_config(config));
    let closer = Arc::new(FeedbackCloser::new(store));

    GatewayState {
        pipeline,
        missing_settings: missing,
        closer,
    }
}

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - Request body size limit (1 MB)
/// - Permissive CORS (the chat UI is served from another origin)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: baubot_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(build_state(&config));
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
