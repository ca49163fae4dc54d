//! Duplicate row removal.

use super::{Transformer, owned_names};
use crate::error::Result;
use crate::table::require_columns;
use polars::prelude::*;
use tracing::debug;

/// Keeps the first occurrence of every distinct row.
///
/// Row identity is the value combination over `subset`, or over every column
/// when `subset` is empty. Surviving rows keep their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateRowDropper {
    subset: Vec<String>,
}

impl DuplicateRowDropper {
    pub fn new<I, S>(subset: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subset: owned_names(subset),
        }
    }

    /// Identity over all columns.
    pub fn all_columns() -> Self {
        Self::default()
    }

    pub fn subset(&self) -> &[String] {
        &self.subset
    }
}

impl Transformer for DuplicateRowDropper {
    fn kind(&self) -> &'static str {
        "duplicate_row_dropper"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let out = if self.subset.is_empty() {
            table.unique_stable(None, UniqueKeepStrategy::First, None)?
        } else {
            require_columns(table, &self.subset)?;
            table.unique_stable(Some(self.subset.as_slice()), UniqueKeepStrategy::First, None)?
        };

        let removed = table.height() - out.height();
        if removed > 0 {
            let pct = (removed as f64 / table.height() as f64) * 100.0;
            debug!("Removed {} duplicate rows ({:.1}%)", removed, pct);
        } else {
            debug!("No duplicate rows found");
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listings() -> DataFrame {
        df![
            "id" => [7i64, 3, 7, 5, 3],
            "price" => [Some(100.0), Some(200.0), Some(999.0), None, Some(200.0)],
            "type" => ["HOUSE", "APARTMENT", "HOUSE", "HOUSE", "APARTMENT"],
        ]
        .unwrap()
    }

    fn ids(table: &DataFrame) -> Vec<Option<i64>> {
        table
            .column("id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_subset_keeps_first_occurrence_in_order() {
        let out = DuplicateRowDropper::new(["id"])
            .fit_transform(&listings(), None)
            .unwrap();

        assert_eq!(ids(&out), vec![Some(7), Some(3), Some(5)]);
        // First occurrence of id 7 carried price 100.
        let price = out.column("price").unwrap().get(0).unwrap();
        assert_eq!(price.try_extract::<f64>().unwrap(), 100.0);
    }

    #[test]
    fn test_all_columns_identity() {
        let out = DuplicateRowDropper::all_columns()
            .transform(&listings())
            .unwrap();

        // Only the second (3, 200.0, APARTMENT) row is an exact duplicate.
        assert_eq!(ids(&out), vec![Some(7), Some(3), Some(7), Some(5)]);
    }

    #[test]
    fn test_idempotent() {
        let dropper = DuplicateRowDropper::new(["id"]);
        let once = dropper.transform(&listings()).unwrap();
        let twice = dropper.transform(&once).unwrap();

        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_never_increases_row_count() {
        let table = listings();
        let out = DuplicateRowDropper::new(["type"]).transform(&table).unwrap();
        assert!(out.height() <= table.height());
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_absent_subset_column() {
        let err = DuplicateRowDropper::new(["url"])
            .transform(&listings())
            .unwrap_err();
        assert_eq!(err.column(), Some("url"));
    }
}
