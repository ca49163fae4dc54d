use crate::reporting::MissingValueReport;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Output of [`Pipeline::process`](crate::Pipeline::process).
#[derive(Debug, Clone)]
pub struct CleaningResult {
    /// The cleaned table.
    pub table: DataFrame,
    pub summary: CleaningSummary,
}

// ============================================================================
// Run Summary Types
// ============================================================================

/// What a pipeline run did to the table, overall and per stage.
///
/// # Example
///
/// ```rust,ignore
/// let result = pipeline.process(&listings)?;
/// println!(
///     "Removed {} rows in {}ms",
///     result.summary.rows_removed(),
///     result.summary.duration_ms
/// );
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows before cleaning.
    pub rows_before: usize,
    /// Number of rows after cleaning.
    pub rows_after: usize,

    /// Number of columns before cleaning.
    pub columns_before: usize,
    /// Number of columns after cleaning.
    pub columns_after: usize,

    /// One entry per stage, in execution order.
    pub stages: Vec<StageSummary>,

    /// Missing values left in the cleaned table.
    pub missing_after: MissingValueReport,
}

impl CleaningSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    pub fn columns_removed(&self) -> usize {
        self.columns_before.saturating_sub(self.columns_after)
    }

    /// Calculate the percentage of rows removed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed() as f32 / self.rows_before as f32) * 100.0
        }
    }
}

/// Shape change caused by a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    pub name: String,
    /// Transformer kind, e.g. `column_dropper`.
    pub kind: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub duration_ms: u64,
}

impl StageSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    pub fn columns_removed(&self) -> usize {
        self.columns_before.saturating_sub(self.columns_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_removed_counts() {
        let summary = CleaningSummary {
            rows_before: 200,
            rows_after: 150,
            columns_before: 30,
            columns_after: 12,
            ..Default::default()
        };

        assert_eq!(summary.rows_removed(), 50);
        assert_eq!(summary.columns_removed(), 18);
        assert_eq!(summary.rows_removed_percentage(), 25.0);
    }

    #[test]
    fn test_empty_summary_percentage() {
        assert_eq!(CleaningSummary::default().rows_removed_percentage(), 0.0);
    }

    #[test]
    fn test_stage_summary_serialization() {
        let stage = StageSummary {
            name: "drop_price_na".to_string(),
            kind: "row_filter_on_missing".to_string(),
            rows_before: 10,
            rows_after: 8,
            columns_before: 5,
            columns_after: 5,
            duration_ms: 1,
        };

        assert_eq!(stage.rows_removed(), 2);
        let json = serde_json::to_string(&stage).unwrap();
        let parsed: StageSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stage);
    }
}
