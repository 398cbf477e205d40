//! Case storage and the closing workflow for BauBot.
//!
//! Cases are created by the intake side into the raw partition; this crate
//! closes them (merging operator feedback) and promotes well-rated
//! resolutions into the approved partition.

pub mod closer;
pub mod file_store;

pub use closer::{ClosedCase, FeedbackCloser, IncomingFeedback};
pub use file_store::FileCaseStore;
