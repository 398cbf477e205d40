//! Fallback resolution — one pass over a strictly descending priority.
//!
//! 1. Zero candidates → `NoInfo` (static escalation message)
//! 2. Extractive answer from the index → `SemanticAnswer` (verbatim)
//! 3. Model generation → `Generated`
//! 4. Best-ranked candidate excerpt → `Snippet`
//!
//! No cross-tier retries: a tier either applies or the next one is tried,
//! exactly once.

use baubot_core::{Answer, AnswerTier, Candidate};

/// Static escalation message when the index has nothing for the query.
pub const NO_INFO_MESSAGE: &str = "Dazu liegen mir keine Informationen in den Handbüchern vor. \
    Bitte wenden Sie sich an den technischen Support (support@baubot.example), \
    damit ein Servicetechniker den Fall übernimmt.";

/// Character cap for the snippet-tier excerpt.
const SNIPPET_CHAR_CAP: usize = 500;

/// Resolve the final answer from the retrieval result and an optional
/// generation.
///
/// The candidate list is returned as citable sources on every tier (empty
/// on `NoInfo`). Zero candidates win over everything, including a
/// non-`None` generation — a generation without sources cannot be cited
/// and is discarded.
pub fn resolve(candidates: Vec<Candidate>, generated: Option<String>) -> Answer {
    if candidates.is_empty() {
        return Answer {
            text: NO_INFO_MESSAGE.to_string(),
            tier: AnswerTier::NoInfo,
            sources: Vec::new(),
        };
    }

    let extractive = candidates
        .iter()
        .find_map(|c| c.extractive_answer())
        .map(String::from);
    if let Some(text) = extractive {
        return Answer {
            text,
            tier: AnswerTier::SemanticAnswer,
            sources: candidates,
        };
    }

    if let Some(text) = generated.filter(|t| !t.trim().is_empty()) {
        return Answer {
            text,
            tier: AnswerTier::Generated,
            sources: candidates,
        };
    }

    Answer {
        text: snippet_text(&candidates[0]),
        tier: AnswerTier::Snippet,
        sources: candidates,
    }
}

/// Synthesize the snippet-tier text from the best-ranked candidate:
/// its label plus a capped excerpt.
fn snippet_text(best: &Candidate) -> String {
    let content = best.content();
    let excerpt: String = content.chars().take(SNIPPET_CHAR_CAP).collect();
    let ellipsis = if content.chars().count() > SNIPPET_CHAR_CAP {
        "…"
    } else {
        ""
    };
    format!("{}: {excerpt}{ellipsis}", best.label(1))
}
