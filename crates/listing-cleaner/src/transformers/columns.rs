//! Column removal.

use super::{Transformer, owned_names};
use crate::error::Result;
use crate::table::require_columns;
use polars::prelude::*;
use tracing::{debug, warn};

/// Drops a fixed set of columns.
///
/// Strict: every named column must exist, otherwise the call fails with
/// [`CleaningError::Schema`](crate::CleaningError::Schema) and nothing is
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDropper {
    columns: Vec<String>,
}

impl ColumnDropper {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: owned_names(columns),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Transformer for ColumnDropper {
    fn kind(&self) -> &'static str {
        "column_dropper"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        if self.columns.is_empty() {
            warn!("Column dropper configured with an empty drop list");
            return Ok(table.clone());
        }

        require_columns(table, &self.columns)?;

        let names: Vec<PlSmallStr> = self.columns.iter().map(|s| s.as_str().into()).collect();
        let out = table.drop_many(names);

        debug!(
            "Dropped {} columns ({} -> {})",
            self.columns.len(),
            table.width(),
            out.width()
        );
        Ok(out)
    }
}
