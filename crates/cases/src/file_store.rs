//! File-based case store — one pretty-printed JSON document per case.
//!
//! Layout: `{root}/{partition-dir}/{case_id}.json`, UTF-8. Partition
//! directories are created on first write. The files are the source of
//! truth and are human-inspectable; an operator can open a case document
//! in an editor.
//!
//! Small files, low write rates: blocking `std::fs` inside the async
//! trait methods is acceptable here.

use async_trait::async_trait;
use baubot_core::error::CaseError;
use baubot_core::{Case, CaseStore, Partition};
use std::path::PathBuf;
use tracing::debug;

/// A case store rooted at a directory with one subdirectory per partition.
pub struct FileCaseStore {
    root: PathBuf,
    raw_dir: String,
    approved_dir: String,
}

impl FileCaseStore {
    /// Create a store at the given root with the default partition names.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            raw_dir: "cases-raw".into(),
            approved_dir: "cases-approved".into(),
        }
    }

    /// Override the partition directory names.
    pub fn with_partitions(
        mut self,
        raw: impl Into<String>,
        approved: impl Into<String>,
    ) -> Self {
        self.raw_dir = raw.into();
        self.approved_dir = approved.into();
        self
    }

    /// Build a store from configuration.
    pub fn from_config(config: &baubot_config::AppConfig) -> Self {
        Self::new(config.cases.resolved_root()).with_partitions(
            config.cases.raw_partition.clone(),
            config.cases.approved_partition.clone(),
        )
    }

    fn partition_dir(&self, partition: Partition) -> PathBuf {
        let dir = match partition {
            Partition::Raw => &self.raw_dir,
            Partition::Approved => &self.approved_dir,
        };
        self.root.join(dir)
    }

    fn case_path(&self, partition: Partition, case_id: &str) -> PathBuf {
        self.partition_dir(partition).join(format!("{case_id}.json"))
    }

    /// Reject ids that are empty or could escape the partition directory.
    fn validate_id(case_id: &str) -> Result<(), CaseError> {
        if case_id.is_empty()
            || case_id.contains('/')
            || case_id.contains('\\')
            || case_id.contains("..")
        {
            return Err(CaseError::InvalidId(case_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CaseStore for FileCaseStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn read(&self, case_id: &str) -> Result<Case, CaseError> {
        Self::validate_id(case_id)?;
        let path = self.case_path(Partition::Raw, case_id);

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CaseError::NotFound(case_id.to_string()));
            }
            Err(e) => {
                return Err(CaseError::Storage(format!(
                    "Failed to read case {case_id}: {e}"
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            CaseError::Storage(format!("Failed to parse case {case_id}: {e}"))
        })
    }

    async fn write(
        &self,
        partition: Partition,
        case_id: &str,
        case: &Case,
    ) -> Result<(), CaseError> {
        Self::validate_id(case_id)?;

        let dir = self.partition_dir(partition);
        std::fs::create_dir_all(&dir).map_err(|e| {
            CaseError::Storage(format!("Failed to create partition directory: {e}"))
        })?;

        let json = serde_json::to_string_pretty(case)
            .map_err(|e| CaseError::Storage(format!("Failed to serialize case: {e}")))?;

        let path = self.case_path(partition, case_id);
        std::fs::write(&path, json)
            .map_err(|e| CaseError::Storage(format!("Failed to write case {case_id}: {e}")))?;

        debug!(%case_id, %partition, path = %path.display(), "Case written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(root: &std::path::Path) -> FileCaseStore {
        FileCaseStore::new(root.to_path_buf())
    }

    #[tokio::test]
    async fn write_then_read_roundtrips() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());

        let case = Case::new("case-1");
        s.write(Partition::Raw, "case-1", &case).await.unwrap();

        let loaded = s.read("case-1").await.unwrap();
        assert_eq!(loaded.case_id, "case-1");
    }

    #[tokio::test]
    async fn read_missing_case_is_not_found() {
        let dir = tempdir().unwrap();
        let err = store(dir.path()).read("case-404").await.unwrap_err();
        assert!(matches!(err, CaseError::NotFound(id) if id == "case-404"));
    }

    #[tokio::test]
    async fn write_is_idempotent_overwrite() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());

        let mut case = Case::new("case-2");
        s.write(Partition::Raw, "case-2", &case).await.unwrap();

        case.resolution
            .insert("success".into(), serde_json::json!(true));
        s.write(Partition::Raw, "case-2", &case).await.unwrap();

        let loaded = s.read("case-2").await.unwrap();
        assert_eq!(loaded.resolution.get("success").unwrap(), true);
    }

    #[tokio::test]
    async fn partitions_are_separate_directories() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());

        let case = Case::new("case-3");
        s.write(Partition::Raw, "case-3", &case).await.unwrap();
        s.write(Partition::Approved, "case-3", &case).await.unwrap();

        assert!(dir.path().join("cases-raw/case-3.json").exists());
        assert!(dir.path().join("cases-approved/case-3.json").exists());
    }

    #[tokio::test]
    async fn files_are_pretty_printed_json() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());
        s.write(Partition::Raw, "case-4", &Case::new("case-4"))
            .await
            .unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("cases-raw/case-4.json")).unwrap();
        assert!(content.contains("\n  \"caseId\""));
    }

    #[tokio::test]
    async fn hostile_ids_rejected_before_any_access() {
        let dir = tempdir().unwrap();
        let s = store(dir.path());

        for id in ["", "../escape", "a/b", "a\\b", ".."] {
            let err = s.read(id).await.unwrap_err();
            assert!(matches!(err, CaseError::InvalidId(_)), "id {id:?}");

            let err = s.write(Partition::Raw, id, &Case::new(id)).await.unwrap_err();
            assert!(matches!(err, CaseError::InvalidId(_)), "id {id:?}");
        }

        // Nothing may have been created for the hostile ids
        assert!(!dir.path().join("cases-raw").exists());
    }

    #[tokio::test]
    async fn custom_partition_names_are_used() {
        let dir = tempdir().unwrap();
        let s = store(dir.path()).with_partitions("eingang", "freigegeben");

        s.write(Partition::Approved, "case-5", &Case::new("case-5"))
            .await
            .unwrap();
        assert!(dir.path().join("freigegeben/case-5.json").exists());
    }
}
