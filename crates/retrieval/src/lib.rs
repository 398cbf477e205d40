//! Document index client for BauBot.
//!
//! One client, parameterized by ranking mode — not separate components per
//! retrieval strategy, so the assembly and fallback logic downstream is
//! never duplicated.

pub mod azure_search;

pub use azure_search::{RankingMode, SearchClient};
