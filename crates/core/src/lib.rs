//! # BauBot Core
//!
//! Domain types, traits, and error definitions for the BauBot support
//! backend. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external capability (document index, text generation, case
//! storage) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod answer;
pub mod candidate;
pub mod case;
pub mod error;
pub mod generate;
pub mod index;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use answer::{Answer, AnswerTier};
pub use candidate::Candidate;
pub use case::{Case, CaseStatus, Partition};
pub use error::{Error, Result};
pub use generate::Generator;
pub use index::SearchIndex;
pub use store::CaseStore;
