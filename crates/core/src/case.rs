//! Support case records and their storage partitions.
//!
//! A case is created by the intake side as a schemaless JSON document in
//! the raw partition; this core only ever closes and promotes it. Wire and
//! storage field names are camelCase because that is what the intake
//! tooling writes — unknown fields are preserved through `extra` so a
//! close round-trip never loses data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a case. Transitions open → closed only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Open,
    Closed,
}

/// A persisted support case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Immutable key. Never changes after creation.
    pub case_id: String,

    #[serde(default)]
    pub status: CaseStatus,

    /// Which machine the case is about, if known. Kept as opaque JSON —
    /// the intake side owns its shape.
    #[serde(default)]
    pub machine: Option<serde_json::Value>,

    /// Operator-supplied resolution data (e.g. `success`, `steps`).
    #[serde(default)]
    pub resolution: serde_json::Map<String, serde_json::Value>,

    /// End-user feedback (e.g. `rating`, `comment`).
    #[serde(default)]
    pub feedback: serde_json::Map<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    /// Any further fields the intake side wrote. Preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Case {
    /// Create a new open case with the given id.
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            status: CaseStatus::Open,
            machine: None,
            resolution: serde_json::Map::new(),
            feedback: serde_json::Map::new(),
            closed_at: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// The two logical storage partitions for cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Every case, as created and later closed.
    Raw,
    /// Curated duplicates of auto-approved cases, reusable as future
    /// retrieval context.
    Approved,
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Approved => write!(f, "approved"),
        }
    }
}
