//! Azure-AI-Search-compatible index client.
//!
//! Talks to `POST {endpoint}/indexes/{index}/docs/search` with an
//! `api-key` header. Supports two ranking modes:
//! - `simple`: plain keyword ranking
//! - `semantic`: semantic reranking with extractive captions and answers
//!
//! The index's internal scoring is opaque to us — we map the wire response
//! into ranked [`Candidate`]s and attach any extractive answers to the
//! documents they were drawn from.

use async_trait::async_trait;
use baubot_core::Candidate;
use baubot_core::error::RetrievalError;
use serde::Deserialize;
use tracing::{debug, warn};

/// Document key aliases used to match extractive answers to candidates.
const KEY_FIELDS: [&str; 4] = ["id", "key", "chunkId", "chunk_id"];

/// How the index should rank results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    /// Keyword ranking only.
    Simple,
    /// Semantic reranking with extractive captions and answers.
    Semantic,
}

impl RankingMode {
    /// Parse the config string form. Unknown values fall back to semantic
    /// (config validation rejects them earlier).
    pub fn parse(s: &str) -> Self {
        match s {
            "simple" => Self::Simple,
            _ => Self::Semantic,
        }
    }
}

/// A client for one search index.
#[derive(Debug)]
pub struct SearchClient {
    endpoint: String,
    api_key: String,
    index: String,
    api_version: String,
    mode: RankingMode,
    client: reqwest::Client,
}

impl SearchClient {
    /// Create a new client for the given index.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        index: impl Into<String>,
        mode: RankingMode,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            index: index.into(),
            api_version: "2023-11-01".into(),
            mode,
            client,
        }
    }

    /// Override the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Build a client from configuration.
    ///
    /// Fails with `RetrievalError::Unavailable` listing the missing
    /// settings when endpoint, key, or index name are unset.
    pub fn from_config(config: &baubot_config::AppConfig) -> Result<Self, RetrievalError> {
        let missing = config.missing_search_settings();
        if !missing.is_empty() {
            return Err(RetrievalError::Unavailable(missing));
        }

        let search = &config.search;
        Ok(Self::new(
            search.endpoint.clone().unwrap_or_default(),
            search.api_key.clone().unwrap_or_default(),
            search.index.clone().unwrap_or_default(),
            RankingMode::parse(&search.ranking),
            search.timeout_secs,
        )
        .with_api_version(search.api_version.clone()))
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, self.api_version
        )
    }

    /// Build the request body for a query.
    fn request_body(&self, query: &str, top: usize) -> serde_json::Value {
        let mut body = serde_json::json!({
            "search": query,
            "top": top,
            "count": true,
        });

        if self.mode == RankingMode::Semantic {
            body["queryType"] = serde_json::json!("semantic");
            body["semanticConfiguration"] = serde_json::json!("default");
            body["captions"] = serde_json::json!("extractive");
            body["answers"] = serde_json::json!("extractive|count-3");
        }

        body
    }

    fn map_reqwest_error(e: reqwest::Error) -> RetrievalError {
        if e.is_timeout() {
            RetrievalError::Timeout(e.to_string())
        } else {
            RetrievalError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl baubot_core::SearchIndex for SearchClient {
    fn name(&self) -> &str {
        "azure-search"
    }

    async fn search(&self, query: &str, top: usize) -> Result<Vec<Candidate>, RetrievalError> {
        let body = self.request_body(query, top);

        debug!(index = %self.index, mode = ?self.mode, top, "Sending search request");

        let response = self
            .client
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Search index returned error");
            return Err(RetrievalError::Api {
                status,
                message: error_body,
            });
        }

        let api_response: ApiSearchResponse =
            response.json().await.map_err(|e| RetrievalError::Api {
                status: 200,
                message: format!("Failed to parse search response: {e}"),
            })?;

        let candidates = api_response.into_candidates(top);
        debug!(hits = candidates.len(), "Search index hits");
        Ok(candidates)
    }

    async fn health_check(&self) -> Result<bool, RetrievalError> {
        let url = format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint, self.index, self.api_version
        );
        let response = self
            .client
            .get(&url)
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;

        Ok(response.status().is_success())
    }
}

// --- Search API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiSearchResponse {
    #[serde(rename = "@search.answers", default)]
    answers: Vec<ApiAnswer>,

    #[serde(default)]
    value: Vec<ApiSearchResult>,
}

#[derive(Debug, Deserialize)]
struct ApiAnswer {
    /// Key of the document the answer was drawn from.
    #[serde(default)]
    key: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiSearchResult {
    #[serde(rename = "@search.score")]
    score: f64,

    #[serde(rename = "@search.captions", default)]
    captions: Vec<ApiCaption>,

    /// Everything else at this level is the document itself.
    #[serde(flatten)]
    document: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiCaption {
    #[serde(default)]
    text: String,
}

impl ApiSearchResponse {
    /// Map the wire response into ranked candidates and distribute the
    /// extractive answers onto the documents they reference.
    fn into_candidates(self, top: usize) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .value
            .into_iter()
            .take(top)
            .map(|r| {
                let caption = r
                    .captions
                    .into_iter()
                    .map(|c| c.text)
                    .find(|t| !t.trim().is_empty());

                // Unknown @search.* annotations are not document fields
                let mut doc = r.document;
                doc.retain(|k, _| !k.starts_with("@search."));

                Candidate {
                    score: r.score,
                    doc,
                    caption,
                    answer: None,
                }
            })
            .collect();

        for answer in self.answers {
            if answer.text.trim().is_empty() {
                continue;
            }
            attach_answer(&mut candidates, answer);
        }

        candidates
    }
}

/// Attach an extractive answer to the candidate whose document key matches.
///
/// When no candidate matches the key (key field not among the aliases, or
/// the referenced document fell outside `top`), the answer is attached to
/// the best-ranked candidate that does not already carry one.
fn attach_answer(candidates: &mut [Candidate], answer: ApiAnswer) {
    let by_key = candidates.iter().position(|c| {
        KEY_FIELDS
            .iter()
            .any(|f| c.doc.get(*f).and_then(|v| v.as_str()) == Some(answer.key.as_str()))
    });

    let target = by_key.or_else(|| candidates.iter().position(|c| c.answer.is_none()));

    if let Some(i) = target
        && candidates[i].answer.is_none()
    {
        candidates[i].answer = Some(answer.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baubot_core::SearchIndex;

    fn test_client(mode: RankingMode) -> SearchClient {
        SearchClient::new(
            "https://docs.search.windows.net/",
            "sk-test",
            "manuals-rag",
            mode,
            15,
        )
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = test_client(RankingMode::Semantic);
        assert_eq!(client.name(), "azure-search");
        assert!(client.search_url().starts_with(
            "https://docs.search.windows.net/indexes/manuals-rag/docs/search?api-version="
        ));
    }

    #[test]
    fn from_config_lists_missing_settings() {
        let config = baubot_config::AppConfig::default();
        let err = SearchClient::from_config(&config).unwrap_err();
        match err {
            RetrievalError::Unavailable(missing) => {
                assert_eq!(missing, vec!["SEARCH_ENDPOINT", "SEARCH_KEY", "SEARCH_INDEX"]);
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn simple_body_has_no_semantic_options() {
        let body = test_client(RankingMode::Simple).request_body("Ölwechsel", 5);
        assert_eq!(body["search"], "Ölwechsel");
        assert_eq!(body["top"], 5);
        assert!(body.get("queryType").is_none());
        assert!(body.get("answers").is_none());
    }

    #[test]
    fn semantic_body_requests_captions_and_answers() {
        let body = test_client(RankingMode::Semantic).request_body("Ölwechsel", 3);
        assert_eq!(body["queryType"], "semantic");
        assert_eq!(body["captions"], "extractive");
        assert_eq!(body["answers"], "extractive|count-3");
    }

    // --- Response parsing tests ---

    #[test]
    fn parse_simple_response() {
        let data = r#"{
            "@odata.count": 2,
            "value": [
                {"@search.score": 2.1, "id": "doc-1", "title": "Bagger 920", "content": "Kapitel 4..."},
                {"@search.score": 1.4, "id": "doc-2", "content": "Kapitel 7..."}
            ]
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        let candidates = parsed.into_candidates(5);

        assert_eq!(candidates.len(), 2);
        assert!((candidates[0].score - 2.1).abs() < f64::EPSILON);
        assert_eq!(candidates[0].content(), "Kapitel 4...");
        assert_eq!(candidates[0].title(), Some("Bagger 920"));
        assert!(candidates[0].caption.is_none());
        // @search.score must not leak into the document
        assert!(!candidates[0].doc.contains_key("@search.score"));
    }

    #[test]
    fn parse_semantic_response_with_captions() {
        let data = r#"{
            "value": [
                {
                    "@search.score": 1.0,
                    "@search.rerankerScore": 2.8,
                    "@search.captions": [{"text": "Motoröl alle 500 Stunden wechseln.", "highlights": ""}],
                    "id": "doc-1",
                    "content": "Der vollständige Wartungsplan..."
                }
            ]
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        let candidates = parsed.into_candidates(5);

        assert_eq!(
            candidates[0].caption.as_deref(),
            Some("Motoröl alle 500 Stunden wechseln.")
        );
        // caption wins content resolution
        assert_eq!(candidates[0].content(), "Motoröl alle 500 Stunden wechseln.");
        assert!(!candidates[0].doc.contains_key("@search.rerankerScore"));
    }

    #[test]
    fn answers_attach_by_document_key() {
        let data = r#"{
            "@search.answers": [
                {"key": "doc-2", "text": "alle 500 Betriebsstunden", "score": 0.97}
            ],
            "value": [
                {"@search.score": 2.0, "id": "doc-1", "content": "..."},
                {"@search.score": 1.5, "id": "doc-2", "content": "..."}
            ]
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        let candidates = parsed.into_candidates(5);

        assert!(candidates[0].extractive_answer().is_none());
        assert_eq!(
            candidates[1].extractive_answer(),
            Some("alle 500 Betriebsstunden")
        );
    }

    #[test]
    fn unmatched_answer_falls_back_to_best_candidate() {
        let data = r#"{
            "@search.answers": [
                {"key": "doc-99", "text": "alle 500 Betriebsstunden"}
            ],
            "value": [
                {"@search.score": 2.0, "id": "doc-1", "content": "..."}
            ]
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        let candidates = parsed.into_candidates(5);
        assert_eq!(
            candidates[0].extractive_answer(),
            Some("alle 500 Betriebsstunden")
        );
    }

    #[test]
    fn empty_response_yields_no_candidates() {
        let parsed: ApiSearchResponse = serde_json::from_str(r#"{"value": []}"#).unwrap();
        assert!(parsed.into_candidates(5).is_empty());
    }

    #[test]
    fn top_limits_candidate_count() {
        let data = r#"{
            "value": [
                {"@search.score": 3.0, "id": "a", "content": "1"},
                {"@search.score": 2.0, "id": "b", "content": "2"},
                {"@search.score": 1.0, "id": "c", "content": "3"}
            ]
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.into_candidates(2).len(), 2);
    }

    #[test]
    fn empty_caption_is_skipped() {
        let data = r#"{
            "value": [
                {"@search.score": 1.0, "@search.captions": [{"text": "  "}], "content": "echter Inhalt"}
            ]
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        let candidates = parsed.into_candidates(5);
        assert!(candidates[0].caption.is_none());
        assert_eq!(candidates[0].content(), "echter Inhalt");
    }
}
