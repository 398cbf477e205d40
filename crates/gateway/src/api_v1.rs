//! HTTP API v1 — the query-answering and case-closing endpoints.
//!
//! - `POST /v1/search`      — Answer a question from the manuals
//! - `POST /v1/cases/close` — Close a support case with feedback
//!
//! Wire field names on the case endpoint are camelCase (`caseId`,
//! `autoApproved`) to match the persisted case documents.

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::SharedState;
use baubot_cases::IncomingFeedback;
use baubot_core::error::{CaseError, RetrievalError};
use baubot_core::{AnswerTier, Candidate, Error};

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/search", post(search_handler))
        .route("/cases/close", post(close_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct SearchRequest {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Deserialize, Default)]
struct SearchParams {
    /// Query-string fallback: `POST /v1/search?q=...`
    #[serde(default)]
    q: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    results: Vec<Candidate>,
    answer: String,
    tier: AnswerTier,
    sources: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloseRequest {
    #[serde(default)]
    case_id: Option<String>,
    #[serde(default)]
    machine: Option<serde_json::Value>,
    #[serde(default)]
    resolution: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    feedback: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CloseResponse {
    ok: bool,
    case_id: String,
    auto_approved: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

type ErrorReply = (StatusCode, Json<ErrorBody>);

/// Central error-to-status mapping. Credentials never appear in payloads;
/// upstream status codes do, so misbehaving backends are diagnosable.
fn error_reply(err: Error) -> ErrorReply {
    let (status, error, details) = match &err {
        Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        Error::Case(CaseError::InvalidId(id)) => (
            StatusCode::BAD_REQUEST,
            format!("Invalid 'caseId': {id:?}"),
            None,
        ),
        Error::Case(CaseError::NotFound(id)) => {
            (StatusCode::NOT_FOUND, "Case not found".into(), Some(id.clone()))
        }
        Error::Case(CaseError::Storage(reason)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Case storage error".into(),
            Some(reason.clone()),
        ),
        Error::Config { missing } | Error::Retrieval(RetrievalError::Unavailable(missing)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error".into(),
            Some(format!("Missing {}", missing.join(" / "))),
        ),
        Error::Retrieval(RetrievalError::Api { status, message }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Retrieval failed".into(),
            Some(format!("Upstream status {status}: {message}")),
        ),
        Error::Retrieval(reason) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Retrieval failed".into(),
            Some(reason.to_string()),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".into(),
            Some(err.to_string()),
        ),
    };

    if status.is_server_error() {
        error!(%err, "Request failed");
    }

    (status, Json(ErrorBody { error, details }))
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn search_handler(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<SearchResponse>, ErrorReply> {
    let query = body
        .and_then(|Json(b)| b.query)
        .or(params.q)
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| {
            error_reply(Error::Validation("Missing 'query' in request body.".into()))
        })?;

    let Some(pipeline) = &state.pipeline else {
        return Err(error_reply(Error::Config {
            missing: state.missing_settings.clone(),
        }));
    };

    info!(query_len = query.len(), "v1/search request");

    let answer = pipeline.answer(&query).await.map_err(error_reply)?;

    Ok(Json(SearchResponse {
        query,
        results: answer.sources.clone(),
        answer: answer.text,
        tier: answer.tier,
        sources: answer.sources,
    }))
}

async fn close_handler(
    State(state): State<SharedState>,
    Json(payload): Json<CloseRequest>,
) -> Result<Json<CloseResponse>, ErrorReply> {
    let case_id = payload
        .case_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| error_reply(Error::Validation("Missing 'caseId'.".into())))?;

    info!(%case_id, "v1/cases/close request");

    let incoming = IncomingFeedback {
        machine: payload.machine,
        resolution: payload.resolution,
        feedback: payload.feedback,
    };

    let closed = state
        .closer
        .close(&case_id, incoming)
        .await
        .map_err(error_reply)?;

    Ok(Json(CloseResponse {
        ok: true,
        case_id,
        auto_approved: closed.auto_approved,
    }))
}
