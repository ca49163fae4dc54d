use crate::table::missing_counts;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Null count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Per-column missing-value counts, in table column order.
///
/// `Display` renders one right-aligned line per column, the way a dataframe
/// library prints a null-count series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub columns: Vec<ColumnMissing>,
}

impl MissingValueReport {
    pub fn from_table(table: &DataFrame) -> Self {
        let columns = missing_counts(table)
            .into_iter()
            .map(|(column, missing)| ColumnMissing { column, missing })
            .collect();
        Self { columns }
    }

    /// Sum over all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    pub fn columns_with_missing(&self) -> Vec<&ColumnMissing> {
        self.columns.iter().filter(|c| c.missing > 0).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.total() == 0
    }

    pub fn missing_in(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }
}

impl fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .columns
            .iter()
            .map(|c| c.column.len())
            .max()
            .unwrap_or(0);
        let count_width = self
            .columns
            .iter()
            .map(|c| c.missing.to_string().len())
            .max()
            .unwrap_or(1);

        for c in &self.columns {
            writeln!(
                f,
                "{:<name_width$}    {:>count_width$}",
                c.column, c.missing
            )?;
        }
        Ok(())
    }
}
