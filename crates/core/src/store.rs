//! CaseStore trait — persistent per-case JSON records.

use crate::case::{Case, Partition};
use crate::error::CaseError;
use async_trait::async_trait;

/// Persistent storage of case records across the raw and approved
/// partitions.
///
/// Implementations must validate the case id before touching storage and
/// must treat `write` as an idempotent overwrite, creating the partition
/// on first use. Cases are never deleted through this trait.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// A human-readable name for this store backend (for logs).
    fn name(&self) -> &str;

    /// Read a case from the raw partition.
    async fn read(&self, case_id: &str) -> std::result::Result<Case, CaseError>;

    /// Write (overwrite) a case into the given partition.
    async fn write(
        &self,
        partition: Partition,
        case_id: &str,
        case: &Case,
    ) -> std::result::Result<(), CaseError>;
}
