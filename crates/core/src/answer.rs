//! The final answer value object and its fallback tier.

use crate::candidate::Candidate;
use serde::{Deserialize, Serialize};

/// The fallback level at which an answer was produced.
///
/// Ordering is strictly descending priority: an extractive answer from the
/// index always beats a model generation, which beats a raw snippet. The
/// tier is carried on every response so tests and logs can observe which
/// path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerTier {
    /// Extractive answer produced by the retrieval backend itself.
    SemanticAnswer,
    /// Model-synthesized answer grounded in the assembled context.
    Generated,
    /// Raw excerpt from the best-ranked document.
    Snippet,
    /// No candidates — static escalation message.
    NoInfo,
}

impl std::fmt::Display for AnswerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SemanticAnswer => "semantic_answer",
            Self::Generated => "generated",
            Self::Snippet => "snippet",
            Self::NoInfo => "no_info",
        };
        write!(f, "{s}")
    }
}

/// An answer with provenance: the text, the tier that produced it, and the
/// candidates it can cite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text shown to the user.
    pub text: String,

    /// Which fallback tier produced the text.
    pub tier: AnswerTier,

    /// Citable source candidates, best-first.
    pub sources: Vec<Candidate>,
}
