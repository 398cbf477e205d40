//! Ranked document fragments returned by the retrieval backend.
//!
//! The index is schemaless from our point of view: the content-bearing
//! field of a document varies between ingestion pipelines. Resolution uses
//! one fixed alias priority list so every consumer (context assembly,
//! snippet fallback) sees the same text for the same candidate.

use serde::{Deserialize, Serialize};

/// Content field aliases, in priority order. A backend caption always wins.
const CONTENT_FIELDS: [&str; 4] = ["content", "chunk", "text", "pageContent"];

/// Title field aliases, in priority order.
const TITLE_FIELDS: [&str; 3] = ["title", "fileName", "filename"];

/// A ranked document fragment from the index, with its relevance score and
/// any backend-extracted caption or answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Relevance score assigned by the index, higher is better.
    pub score: f64,

    /// The raw document as returned by the index.
    #[serde(rename = "document")]
    pub doc: serde_json::Map<String, serde_json::Value>,

    /// Backend-extracted highlight for this document (semantic ranking only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Backend-extracted answer drawn from this document (semantic ranking
    /// only). Distinct from a model-synthesized answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Candidate {
    /// Resolve the candidate's text content.
    ///
    /// Priority: caption, then the content field aliases in order. A
    /// candidate whose document carries none of the aliases (or only
    /// non-string values) resolves to `""` rather than failing.
    pub fn content(&self) -> &str {
        if let Some(caption) = self.caption.as_deref()
            && !caption.is_empty()
        {
            return caption;
        }
        CONTENT_FIELDS
            .iter()
            .find_map(|field| self.doc.get(*field).and_then(|v| v.as_str()))
            .unwrap_or("")
    }

    /// Resolve the candidate's title, if the document carries one.
    pub fn title(&self) -> Option<&str> {
        TITLE_FIELDS
            .iter()
            .find_map(|field| self.doc.get(*field).and_then(|v| v.as_str()))
            .filter(|t| !t.is_empty())
    }

    /// Resolve a display label: the title, or `Quelle {n}` for untitled
    /// documents (`n` is the 1-based rank).
    pub fn label(&self, rank: usize) -> String {
        match self.title() {
            Some(title) => title.to_string(),
            None => format!("Quelle {rank}"),
        }
    }

    /// The extractive answer, if the backend produced a non-empty one.
    pub fn extractive_answer(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.trim().is_empty())
    }
}
