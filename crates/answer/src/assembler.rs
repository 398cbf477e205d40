//! Context assembly — deterministic selection and truncation of candidates
//! into a bounded, labeled text block for generation.
//!
//! Pure functions, no I/O. Identical inputs always produce identical
//! output: the generation prompt for a query is reproducible from the
//! retrieval result alone.

use baubot_core::Candidate;

/// How many candidates are included in the context at most.
pub const DEFAULT_MAX_DOCS: usize = 5;

/// Per-candidate character cap (characters, not bytes — the manuals are
/// German text and a byte cut could split an umlaut).
pub const DEFAULT_PER_DOC_CHAR_CAP: usize = 1500;

/// Sentinel context when retrieval returned nothing. The context block is
/// never empty.
pub const EMPTY_CONTEXT: &str = "Keine relevanten Dokumente in der Datenbank gefunden.";

/// Separator between source blocks.
const SEPARATOR: &str = "\n---\n";

/// Assemble a labeled context block from ranked candidates.
///
/// Takes the first `max_docs` candidates (they arrive best-first from the
/// index), resolves each one's content and title through the fixed alias
/// lists on [`Candidate`], truncates content to exactly `per_doc_char_cap`
/// characters, and labels each block with its 1-based rank.
pub fn assemble(candidates: &[Candidate], max_docs: usize, per_doc_char_cap: usize) -> String {
    if candidates.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    candidates
        .iter()
        .take(max_docs)
        .enumerate()
        .map(|(i, candidate)| {
            let rank = i + 1;
            let snippet: String = candidate.content().chars().take(per_doc_char_cap).collect();
            format!("[Quelle {rank} - {}]:\n{snippet}", candidate.label(rank))
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(score: f64, doc: serde_json::Value) -> Candidate {
        Candidate {
            score,
            doc: doc.as_object().cloned().unwrap_or_default(),
            caption: None,
            answer: None,
        }
    }

    #[test]
    fn zero_candidates_yields_sentinel() {
        let context = assemble(&[], DEFAULT_MAX_DOCS, DEFAULT_PER_DOC_CHAR_CAP);
        assert_eq!(context, EMPTY_CONTEXT);
        assert!(!context.is_empty());
    }

    #[test]
    fn labels_are_one_based_and_titled() {
        let candidates = vec![
            candidate(2.0, json!({"title": "Bagger 920 Handbuch", "content": "Kapitel 4"})),
            candidate(1.0, json!({"content": "Kapitel 7"})),
        ];
        let context = assemble(&candidates, 5, 1500);

        assert!(context.contains("[Quelle 1 - Bagger 920 Handbuch]:\nKapitel 4"));
        // Untitled document gets a synthesized label
        assert!(context.contains("[Quelle 2 - Quelle 2]:\nKapitel 7"));
        assert!(context.contains("\n---\n"));
    }

    #[test]
    fn truncates_to_exact_char_cap() {
        let long = "ä".repeat(2000);
        let candidates = vec![candidate(1.0, json!({"content": long}))];
        let context = assemble(&candidates, 5, 1500);

        let snippet = context.split(":\n").nth(1).unwrap();
        assert_eq!(snippet.chars().count(), 1500);
    }

    #[test]
    fn short_content_is_untouched() {
        let candidates = vec![candidate(1.0, json!({"content": "kurz"}))];
        let context = assemble(&candidates, 5, 1500);
        assert!(context.ends_with(":\nkurz"));
    }

    #[test]
    fn max_docs_limits_block_count() {
        let candidates: Vec<Candidate> = (0..8)
            .map(|i| candidate(8.0 - i as f64, json!({"content": format!("Dok {i}")})))
            .collect();
        let context = assemble(&candidates, 5, 1500);

        assert_eq!(context.matches("[Quelle ").count(), 5);
        assert!(!context.contains("Dok 5"));
    }

    #[test]
    fn caption_preferred_over_content_field() {
        let mut c = candidate(1.0, json!({"content": "sehr langes Kapitel"}));
        c.caption = Some("der relevante Satz".into());
        let context = assemble(&[c], 5, 1500);
        assert!(context.contains("der relevante Satz"));
        assert!(!context.contains("sehr langes Kapitel"));
    }

    #[test]
    fn unresolvable_content_yields_empty_block() {
        let candidates = vec![candidate(1.0, json!({"pages": 42}))];
        let context = assemble(&candidates, 5, 1500);
        assert_eq!(context, "[Quelle 1 - Quelle 1]:\n");
    }

    #[test]
    fn deterministic_for_identical_input() {
        let candidates = vec![candidate(1.0, json!({"title": "A", "content": "x"}))];
        let a = assemble(&candidates, 5, 1500);
        let b = assemble(&candidates, 5, 1500);
        assert_eq!(a, b);
    }
}
