//! Output formatting for the diff coverage summary.

use serde::Serialize;

use crate::model::DiffSummary;

/// The one-line text report, printed whether or not the gate passes.
#[must_use]
pub fn text(summary: &DiffSummary) -> String {
    format!(
        "Diff coverage: {:.2}% ({}/{} statements)",
        summary.percent(),
        summary.covered,
        summary.total
    )
}

/// The stderr diagnostic emitted when the gate fails.
#[must_use]
pub fn failure(summary: &DiffSummary, threshold: f64) -> String {
    format!(
        "diff coverage {:.2}% is below threshold {:.2}%",
        summary.percent(),
        threshold
    )
}

/// Machine-readable summary for pipeline consumers.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub covered: u64,
    pub total: u64,
    pub percent: f64,
    pub threshold: f64,
    pub passed: bool,
}

impl JsonReport {
    #[must_use]
    pub fn new(summary: &DiffSummary, threshold: f64) -> Self {
        Self {
            covered: summary.covered,
            total: summary.total,
            percent: summary.percent(),
            threshold,
            passed: summary.passes(threshold),
        }
    }
}

/// Render the JSON report.
pub fn json(summary: &DiffSummary, threshold: f64) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::new(summary, threshold))
}
