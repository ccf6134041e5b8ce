use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::item::UploadItem;
use super::key::StorageKey;
use crate::error::FailureKind;

/// Where an item is in its pipeline. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Pending,
    Transforming,
    Uploading,
    Succeeded,
    Failed,
}

impl ItemState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemState::Succeeded | ItemState::Failed)
    }
}

impl Display for ItemState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            ItemState::Pending => "pending",
            ItemState::Transforming => "transforming",
            ItemState::Uploading => "uploading",
            ItemState::Succeeded => "succeeded",
            ItemState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success {
        content_type: String,
        size_bytes: u64,
    },
    Failure {
        kind: FailureKind,
        reason: String,
    },
}

impl UploadOutcome {
    pub fn failure(kind: FailureKind, reason: impl Into<String>) -> Self {
        UploadOutcome::Failure {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    pub fn state(&self) -> ItemState {
        if self.is_success() {
            ItemState::Succeeded
        } else {
            ItemState::Failed
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success { .. } => None,
            UploadOutcome::Failure { reason, .. } => Some(reason),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            UploadOutcome::Success { .. } => None,
            UploadOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Record produced exactly once per input item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub item: UploadItem,
    pub key: StorageKey,
    pub outcome: UploadOutcome,
}

/// Aggregate of one pipeline run, results in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<UploadResult>,
}

impl BatchSummary {
    /// Derive counts from the ordered results.
    pub fn from_results(results: Vec<UploadResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        BatchSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &UploadResult> {
        self.results.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Directive, SourceRef};

    fn result(name: &str, outcome: UploadOutcome) -> UploadResult {
        let item = UploadItem::new(name, SourceRef::from(name), Directive::default()).unwrap();
        UploadResult {
            key: StorageKey::from(format!("6-2025/{}", name)),
            item,
            outcome,
        }
    }

    #[test]
    fn test_summary_counts_are_consistent() {
        let summary = BatchSummary::from_results(vec![
            result(
                "a.webp",
                UploadOutcome::Success {
                    content_type: "image/webp".to_string(),
                    size_bytes: 10,
                },
            ),
            result(
                "b.webp",
                UploadOutcome::failure(FailureKind::Decode, "Failed to decode image"),
            ),
        ]);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert!(!summary.all_succeeded());

        let failed: Vec<_> = summary.failures().map(|r| r.item.logical_name()).collect();
        assert_eq!(failed, vec!["b.webp"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_results(Vec::new());
        assert_eq!(summary.total, 0);
        assert!(summary.all_succeeded());
    }

    #[test]
    fn test_outcome_state() {
        let failure = UploadOutcome::failure(FailureKind::StoreRejected, "no such bucket");
        assert_eq!(failure.state(), ItemState::Failed);
        assert!(failure.state().is_terminal());
        assert_eq!(failure.reason(), Some("no such bucket"));
        assert_eq!(failure.failure_kind(), Some(FailureKind::StoreRejected));
        assert!(!ItemState::Uploading.is_terminal());
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = BatchSummary::from_results(vec![result(
            "a.webp",
            UploadOutcome::failure(FailureKind::StoreUnavailable, "timeout"),
        )]);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["total"], 1);
        assert_eq!(json["results"][0]["key"], "6-2025/a.webp");
        assert_eq!(json["results"][0]["outcome"]["status"], "failure");
        assert_eq!(json["results"][0]["outcome"]["kind"], "store_unavailable");
        assert_eq!(json["results"][0]["item"]["directive"]["format"], "webp");
    }
}
