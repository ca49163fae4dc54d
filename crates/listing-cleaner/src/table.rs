//! Schema helpers over [`DataFrame`].
//!
//! The cleaning pipeline operates on plain polars frames. Nulls are the
//! missing marker; these helpers translate polars lookups into the crate's
//! error vocabulary so that transformers can fail with
//! [`CleaningError::Schema`] instead of a generic polars error.

use crate::error::{CleaningError, Result};
use crate::utils::{DtypeCategory, series_dtype_category};
use polars::prelude::*;

/// Look up a column, failing with [`CleaningError::Schema`] when it is absent.
pub fn require_column<'a>(table: &'a DataFrame, name: &str) -> Result<&'a Series> {
    table
        .column(name)
        .map(|column| column.as_materialized_series())
        .map_err(|_| CleaningError::schema(name))
}

/// Ensure every listed column is present. Reports the first absent one.
pub fn require_columns<S: AsRef<str>>(table: &DataFrame, names: &[S]) -> Result<()> {
    for name in names {
        require_column(table, name.as_ref())?;
    }
    Ok(())
}

/// Whether the table has a column with this name.
pub fn has_column(table: &DataFrame, name: &str) -> bool {
    table.column(name).is_ok()
}

/// Column names in table order.
pub fn column_names(table: &DataFrame) -> Vec<String> {
    table
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Names of all text (`String`) columns, in table order.
pub fn text_columns(table: &DataFrame) -> Vec<String> {
    table
        .get_columns()
        .iter()
        .filter(|column| {
            series_dtype_category(column.as_materialized_series()) == DtypeCategory::Text
        })
        .map(|column| column.name().to_string())
        .collect()
}

/// Null count per column, in table order.
pub fn missing_counts(table: &DataFrame) -> Vec<(String, usize)> {
    table
        .get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect()
}

/// Replace a column in a copy of `table`.
///
/// The input frame is left untouched; columns are reference counted so the
/// copy only costs the replaced column.
pub fn with_replaced(table: &DataFrame, name: &str, series: Series) -> Result<DataFrame> {
    let mut out = table.clone();
    out.replace(name, series)?;
    Ok(out)
}
