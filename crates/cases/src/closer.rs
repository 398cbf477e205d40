//! Case closing — merge operator feedback, decide auto-approval, promote.
//!
//! A close never creates a case: the record must already exist in the raw
//! partition. Merging is a shallow union (incoming keys override
//! same-named existing keys, everything else is preserved), and approval
//! duplicates — never moves — the case into the approved partition.

use std::sync::Arc;

use baubot_core::{Case, CaseStatus, CaseStore, Partition};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

/// Minimum feedback rating for auto-approval.
const APPROVAL_RATING_THRESHOLD: f64 = 4.0;

/// Operator-supplied data accompanying a close.
#[derive(Debug, Clone, Default)]
pub struct IncomingFeedback {
    pub machine: Option<Value>,
    pub resolution: serde_json::Map<String, Value>,
    pub feedback: serde_json::Map<String, Value>,
}

/// Result of a close: the merged case and the approval decision.
#[derive(Debug, Clone)]
pub struct ClosedCase {
    pub case: Case,
    pub auto_approved: bool,
}

/// Closes cases against a [`CaseStore`].
pub struct FeedbackCloser {
    store: Arc<dyn CaseStore>,
}

impl FeedbackCloser {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    /// Close a case, merging `incoming` into the stored record.
    ///
    /// Fails with `CaseError::NotFound` (and performs no writes) when the
    /// case does not exist. Read-then-write is not atomic; concurrent
    /// closes of the same case race with last-writer-wins on the store.
    pub async fn close(
        &self,
        case_id: &str,
        incoming: IncomingFeedback,
    ) -> baubot_core::Result<ClosedCase> {
        let mut case = self.store.read(case_id).await?;

        case.status = CaseStatus::Closed;
        case.closed_at = Some(Utc::now());
        if incoming.machine.is_some() {
            case.machine = incoming.machine;
        }
        shallow_merge(&mut case.resolution, incoming.resolution);
        shallow_merge(&mut case.feedback, incoming.feedback);

        self.store.write(Partition::Raw, case_id, &case).await?;

        let auto_approved = auto_approve(&case.resolution, &case.feedback);
        if auto_approved {
            self.store
                .write(Partition::Approved, case_id, &case)
                .await?;
        }

        info!(%case_id, auto_approved, "Case closed");
        Ok(ClosedCase {
            case,
            auto_approved,
        })
    }
}

/// Shallow union: incoming keys strictly override same-named existing
/// keys; other existing keys are untouched.
fn shallow_merge(
    existing: &mut serde_json::Map<String, Value>,
    incoming: serde_json::Map<String, Value>,
) {
    for (key, value) in incoming {
        existing.insert(key, value);
    }
}

/// The approval decision: `resolution.success` must be boolean `true`
/// (not merely truthy) and the numeric feedback rating must reach the
/// threshold.
fn auto_approve(
    resolution: &serde_json::Map<String, Value>,
    feedback: &serde_json::Map<String, Value>,
) -> bool {
    let success = resolution.get("success").and_then(Value::as_bool) == Some(true);
    success && to_number(feedback.get("rating")) >= APPROVAL_RATING_THRESHOLD
}

/// Coerce a JSON value to a number: numbers pass through, numeric strings
/// parse, everything else (including missing) is 0.
fn to_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
