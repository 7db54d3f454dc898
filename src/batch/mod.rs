//! Batch operation runner.
//!
//! Bulk actions (delete several mocks, mark several analyzed) run one
//! operation per item, keep going on failure, and report one aggregated
//! result with per-item outcomes.

use serde::Serialize;
use std::fmt::Display;
use tracing::{info, warn};

/// Outcome of one item within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemOutcome {
    pub id: String,
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result of a batch operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub succeeded: u32,
    pub failed: u32,
    pub items: Vec<BatchItemOutcome>,
}

impl BatchReport {
    pub fn record_ok(&mut self, id: String) {
        self.succeeded += 1;
        self.items.push(BatchItemOutcome {
            id,
            ok: true,
            error: None,
        });
    }

    pub fn record_err(&mut self, id: String, error: String) {
        self.failed += 1;
        self.items.push(BatchItemOutcome {
            id,
            ok: false,
            error: Some(error),
        });
    }

    pub fn total(&self) -> u32 {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run `op` once per item, collecting per-item outcomes.
///
/// A failing item never aborts the batch; its error is recorded and the
/// remaining items still run.
pub fn run_batch<T, E, F>(items: &[T], id_of: impl Fn(&T) -> String, mut op: F) -> BatchReport
where
    E: Display,
    F: FnMut(&T) -> Result<(), E>,
{
    let mut report = BatchReport::default();

    for item in items {
        let id = id_of(item);
        match op(item) {
            Ok(()) => report.record_ok(id),
            Err(e) => {
                warn!(item = %id, error = %e, "batch item failed");
                report.record_err(id, e.to_string());
            }
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "batch complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_items_succeed() {
        let items = vec!["a", "b", "c"];
        let report = run_batch(&items, |i| i.to_string(), |_| Ok::<(), String>(()));

        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(report.total(), 3);
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let items = vec!["a", "bad", "c"];
        let report = run_batch(
            &items,
            |i| i.to_string(),
            |i| {
                if *i == "bad" {
                    Err("not found".to_string())
                } else {
                    Ok(())
                }
            },
        );

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_succeeded());

        let failed = report.items.iter().find(|o| !o.ok).unwrap();
        assert_eq!(failed.id, "bad");
        assert_eq!(failed.error.as_deref(), Some("not found"));
    }

    #[test]
    fn test_empty_batch() {
        let items: Vec<String> = vec![];
        let report = run_batch(&items, |i| i.clone(), |_| Ok::<(), String>(()));
        assert_eq!(report.total(), 0);
        assert!(report.all_succeeded());
        assert!(report.items.is_empty());
    }

    #[test]
    fn test_outcomes_preserve_input_order() {
        let items = vec!["x", "y"];
        let report = run_batch(&items, |i| i.to_string(), |_| Ok::<(), String>(()));
        let ids: Vec<&str> = report.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn test_report_serialization_skips_empty_errors() {
        let mut report = BatchReport::default();
        report.record_ok("a".to_string());
        report.record_err("b".to_string(), "boom".to_string());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["items"][0].get("error").is_none());
        assert_eq!(json["items"][1]["error"], "boom");
    }
}
