//! Error types for the BauBot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all BauBot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Case errors ---
    #[error("Case error: {0}")]
    Case(#[from] CaseError),

    // --- Configuration errors ---
    #[error("Configuration error: missing {}", .missing.join(", "))]
    Config { missing: Vec<String> },

    // --- Request validation ---
    #[error("Validation error: {0}")]
    Validation(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures talking to the external document index.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    /// Required index settings are absent. Fatal, never retried.
    #[error("Search index not configured: missing {}", .0.join(", "))]
    Unavailable(Vec<String>),

    #[error("Search request failed: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Search request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of the text-generation capability.
///
/// These never surface as request failures — the answer pipeline degrades
/// to a lower tier instead. The variants exist so logs can tell an empty
/// completion apart from a content-filter rejection or a dead endpoint.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Generation blocked by content filter")]
    ContentFiltered,

    #[error("Generation returned empty output")]
    Empty,

    #[error("Generation request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of the case store.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The case id is empty or would escape the partition directory.
    #[error("Invalid case id: {0:?}")]
    InvalidId(String),

    #[error("Case not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
