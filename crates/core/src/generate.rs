//! Generator trait — the abstraction over the text-generation capability.

use async_trait::async_trait;

/// An external capability that synthesizes an answer from a query and an
/// assembled context block.
///
/// `generate` deliberately returns `Option<String>` instead of a `Result`:
/// every failure mode (transport error, content filter, empty completion,
/// timeout) means the same thing to the caller — "no usable generation,
/// fall through to the next tier". Implementations log the specific reason
/// before returning `None`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator backend (for logs).
    fn name(&self) -> &str;

    /// Generate an answer for `query` grounded in `context`, or `None`
    /// when no usable text was produced.
    async fn generate(&self, query: &str, context: &str) -> Option<String>;
}
