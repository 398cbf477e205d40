//! The canonical query-answering pipeline.
//!
//! retrieval → context assembly → generation → fallback resolution.
//!
//! Stateless per invocation; concurrency across requests comes entirely
//! from the hosting dispatch layer. Retrieval failure fails the request;
//! generation failure never does (it degrades the tier).

use std::sync::Arc;

use baubot_core::{Answer, Candidate, Generator, SearchIndex};
use tracing::{debug, info};

use crate::{assembler, resolver};

/// Default number of candidates requested from the index.
const DEFAULT_TOP_K: usize = 5;

/// The assembled pipeline over an index and a generator.
pub struct AnswerPipeline {
    index: Arc<dyn SearchIndex>,
    generator: Arc<dyn Generator>,
    top_k: usize,
    max_docs: usize,
    per_doc_char_cap: usize,
}

impl AnswerPipeline {
    /// Create a pipeline with the canonical parameters.
    pub fn new(index: Arc<dyn SearchIndex>, generator: Arc<dyn Generator>) -> Self {
        Self {
            index,
            generator,
            top_k: DEFAULT_TOP_K,
            max_docs: assembler::DEFAULT_MAX_DOCS,
            per_doc_char_cap: assembler::DEFAULT_PER_DOC_CHAR_CAP,
        }
    }

    /// Override how many candidates are requested from the index.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a query.
    ///
    /// The generator is never invoked when retrieval returned zero
    /// candidates — the resolver would discard its output anyway, so the
    /// external call would be wasted.
    pub async fn answer(&self, query: &str) -> baubot_core::Result<Answer> {
        let candidates: Vec<Candidate> = self.index.search(query, self.top_k).await?;
        debug!(hits = candidates.len(), "Retrieval complete");

        let answer = if candidates.is_empty() {
            resolver::resolve(candidates, None)
        } else {
            let context =
                assembler::assemble(&candidates, self.max_docs, self.per_doc_char_cap);
            let generated = self.generator.generate(query, &context).await;
            resolver::resolve(candidates, generated)
        };

        info!(
            tier = %answer.tier,
            sources = answer.sources.len(),
            "Answer resolved"
        );

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use baubot_core::AnswerTier;
    use baubot_core::error::RetrievalError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- Mock backends ---

    struct MockIndex {
        result: Result<Vec<Candidate>, RetrievalError>,
    }

    #[async_trait]
    impl SearchIndex for MockIndex {
        fn name(&self) -> &str {
            "mock-index"
        }

        async fn search(
            &self,
            _query: &str,
            _top: usize,
        ) -> Result<Vec<Candidate>, RetrievalError> {
            self.result.clone()
        }
    }

    struct MockGenerator {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl MockGenerator {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(String::from),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Generator for MockGenerator {
        fn name(&self) -> &str {
            "mock-generator"
        }

        async fn generate(&self, _query: &str, context: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(!context.is_empty(), "generator must never see an empty context");
            self.reply.clone()
        }
    }

    fn candidate(doc: serde_json::Value) -> Candidate {
        Candidate {
            score: 1.0,
            doc: doc.as_object().cloned().unwrap_or_default(),
            caption: None,
            answer: None,
        }
    }

    fn pipeline(
        result: Result<Vec<Candidate>, RetrievalError>,
        reply: Option<&str>,
    ) -> (AnswerPipeline, Arc<MockGenerator>) {
        let generator = Arc::new(MockGenerator::new(reply));
        let p = AnswerPipeline::new(
            Arc::new(MockIndex { result }),
            generator.clone(),
        );
        (p, generator)
    }

    #[tokio::test]
    async fn zero_candidates_short_circuits_generation() {
        // Scenario: "Fehlercode E204" with nothing in the index
        let (p, generator) = pipeline(Ok(Vec::new()), Some("sollte nie ankommen"));

        let answer = p.answer("Fehlercode E204").await.unwrap();
        assert_eq!(answer.tier, AnswerTier::NoInfo);
        assert_eq!(answer.text, resolver::NO_INFO_MESSAGE);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn extractive_answer_wins_over_generation() {
        // Scenario: "Ölwechsel Intervall" with a semantic highlight
        let mut best = candidate(json!({"title": "Wartung", "content": "..."}));
        best.answer = Some("alle 500 Betriebsstunden".into());
        let candidates = vec![
            best,
            candidate(json!({"content": "Kapitel 2"})),
            candidate(json!({"content": "Kapitel 9"})),
        ];
        let (p, generator) = pipeline(Ok(candidates), Some("generierte Antwort"));

        let answer = p.answer("Ölwechsel Intervall").await.unwrap();
        assert_eq!(answer.tier, AnswerTier::SemanticAnswer);
        assert_eq!(answer.text, "alle 500 Betriebsstunden");
        assert_eq!(answer.sources.len(), 3);
        // The generator still ran (candidates existed), but lost the tier race
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generation_tier_when_generator_succeeds() {
        let candidates = vec![candidate(json!({"content": "Hydrauliköl HLP 46"}))];
        let (p, _) = pipeline(Ok(candidates), Some("Verwenden Sie HLP 46. [Quelle 1]"));

        let answer = p.answer("Welches Hydrauliköl?").await.unwrap();
        assert_eq!(answer.tier, AnswerTier::Generated);
        assert_eq!(answer.text, "Verwenden Sie HLP 46. [Quelle 1]");
    }

    #[tokio::test]
    async fn snippet_tier_when_generation_unusable() {
        let candidates = vec![candidate(json!({"title": "Bagger 920", "content": "Kapitel 4"}))];
        let (p, generator) = pipeline(Ok(candidates), None);

        let answer = p.answer("irgendwas").await.unwrap();
        assert_eq!(answer.tier, AnswerTier::Snippet);
        assert!(answer.text.starts_with("Bagger 920: "));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retrieval_failure_propagates() {
        let (p, generator) = pipeline(
            Err(RetrievalError::Api {
                status: 503,
                message: "index overloaded".into(),
            }),
            Some("egal"),
        );

        let err = p.answer("Ölwechsel").await.unwrap_err();
        assert!(matches!(err, baubot_core::Error::Retrieval(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
