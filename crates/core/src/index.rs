//! SearchIndex trait — the abstraction over the document index.
//!
//! The index's internal ranking is an opaque capability: we send a query,
//! we get ranked candidates back. Implementations: the Azure-AI-Search
//! style REST client in `baubot-retrieval`, mocks in tests.

use crate::candidate::Candidate;
use crate::error::RetrievalError;
use async_trait::async_trait;

/// An external document index that returns ranked candidates for a query.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// A human-readable name for this index backend (for logs).
    fn name(&self) -> &str;

    /// Return up to `top` candidates for `query`, best-first.
    ///
    /// Candidates may carry backend-extracted captions and answers
    /// depending on the ranking mode of the implementation.
    async fn search(&self, query: &str, top: usize)
    -> std::result::Result<Vec<Candidate>, RetrievalError>;

    /// Health check — can we reach the index?
    async fn health_check(&self) -> std::result::Result<bool, RetrievalError> {
        Ok(true)
    }
}
