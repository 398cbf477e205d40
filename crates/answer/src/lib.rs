//! Query-answering pipeline for BauBot.
//!
//! One canonical pipeline: retrieval → context assembly → generation →
//! multi-tier fallback. The stages are separable and individually
//! testable; [`AnswerPipeline`] strings them together.

pub mod assembler;
pub mod chat;
pub mod pipeline;
pub mod resolver;

pub use chat::ChatClient;
pub use pipeline::AnswerPipeline;
