//! Missing-value handling: dropping rows and filling nulls.

use super::{Transformer, owned_names};
use crate::error::{CleaningError, Result};
use crate::table::{require_column, require_columns};
use crate::utils::{
    DtypeCategory, fill_bool_nulls, fill_float_nulls, fill_int_nulls, fill_string_nulls,
    parse_boolean_token, series_dtype_category,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// =============================================================================
// RowFilterOnMissing
// =============================================================================

/// Keeps only the rows where none of the listed columns is null.
///
/// An empty column list means every column is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilterOnMissing {
    subset: Vec<String>,
}

impl RowFilterOnMissing {
    pub fn new<I, S>(subset: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subset: owned_names(subset),
        }
    }

    /// Filter on a single column.
    pub fn for_column(column: impl Into<String>) -> Self {
        Self {
            subset: vec![column.into()],
        }
    }

    pub fn subset(&self) -> &[String] {
        &self.subset
    }
}

impl Transformer for RowFilterOnMissing {
    fn kind(&self) -> &'static str {
        "row_filter_on_missing"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let out = if self.subset.is_empty() {
            table.drop_nulls::<String>(None)?
        } else {
            require_columns(table, &self.subset)?;
            table.drop_nulls(Some(self.subset.as_slice()))?
        };

        debug!(
            "Dropped {} rows with missing values in {:?}",
            table.height() - out.height(),
            self.subset
        );
        Ok(out)
    }
}

// =============================================================================
// ValueReplacer
// =============================================================================

/// A literal fill value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for FillValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FillValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FillValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FillValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FillValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// How a [`ValueReplacer`] computes the value written into null cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Write this literal, coerced to the column's type.
    Value(FillValue),
    /// Arithmetic mean of the column's non-missing values, truncated toward zero.
    Mean,
}

impl FillStrategy {
    pub fn value(value: impl Into<FillValue>) -> Self {
        Self::Value(value.into())
    }
}

/// Replaces nulls in one or more columns.
///
/// Columns are processed independently in listed order; with
/// [`FillStrategy::Mean`] each column's mean comes from its own non-missing
/// values only.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueReplacer {
    columns: Vec<String>,
    strategy: FillStrategy,
}

impl ValueReplacer {
    pub fn new<I, S>(columns: I, strategy: FillStrategy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: owned_names(columns),
            strategy,
        }
    }

    /// Replace nulls in a single column.
    pub fn for_column(column: impl Into<String>, strategy: FillStrategy) -> Self {
        Self {
            columns: vec![column.into()],
            strategy,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn strategy(&self) -> &FillStrategy {
        &self.strategy
    }

    fn fill_column(&self, series: &Series) -> Result<Series> {
        let filled = match &self.strategy {
            FillStrategy::Mean => fill_with_mean(series)?,
            FillStrategy::Value(value) => fill_with_value(series, value)?,
        };
        keep_numeric_width(series, filled)
    }
}

impl Transformer for ValueReplacer {
    fn kind(&self) -> &'static str {
        "value_replacer"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let mut out = table.clone();

        for name in &self.columns {
            let series = require_column(&out, name)?;
            let missing = series.null_count();
            let filled = self.fill_column(series)?;
            out.replace(name, filled)?;
            debug!("Filled {} missing values in '{}'", missing, name);
        }

        Ok(out)
    }
}

/// The fill helpers widen to `Int64`/`Float64`. Narrow back to the column's
/// own dtype unless the fill moved it to another category (integer to float).
fn keep_numeric_width(original: &Series, filled: Series) -> Result<Series> {
    let category = series_dtype_category(original);
    if filled.dtype() == original.dtype()
        || !category.is_numeric()
        || series_dtype_category(&filled) != category
    {
        return Ok(filled);
    }

    filled.strict_cast(original.dtype()).map_err(|_| {
        CleaningError::precondition(
            original.name().as_str(),
            format!("fill value does not fit a {} column", original.dtype()),
        )
    })
}

fn fill_with_mean(series: &Series) -> Result<Series> {
    let name = series.name().as_str();

    if series.null_count() == series.len() {
        return Err(CleaningError::invalid_operation(
            name,
            "mean is undefined for a column without any non-missing value",
        ));
    }

    let category = series_dtype_category(series);
    if !category.is_numeric() {
        return Err(CleaningError::precondition(
            name,
            format!("mean fill requires a numeric column, found {}", series.dtype()),
        ));
    }

    let mean = series.mean().ok_or_else(|| {
        CleaningError::invalid_operation(name, "mean could not be computed")
    })?;
    let fill = mean.trunc();
    debug!("Mean of '{}' is {} (filling with {})", name, mean, fill);

    let filled = match category {
        DtypeCategory::Integer => fill_int_nulls(series, fill as i64)?,
        _ => fill_float_nulls(series, fill)?,
    };
    Ok(filled)
}

fn fill_with_value(series: &Series, value: &FillValue) -> Result<Series> {
    let name = series.name().as_str();
    let incompatible = || {
        CleaningError::precondition(
            name,
            format!("cannot fill a {} column with {:?}", series.dtype(), value),
        )
    };

    let filled = match (series_dtype_category(series), value) {
        (DtypeCategory::Text, value) => fill_string_nulls(series, &value.to_string())?,

        (DtypeCategory::Boolean, FillValue::Bool(b)) => fill_bool_nulls(series, *b)?,
        (DtypeCategory::Boolean, FillValue::Int(i @ (0 | 1))) => {
            fill_bool_nulls(series, *i == 1)?
        }
        (DtypeCategory::Boolean, FillValue::Text(token)) => {
            let b = parse_boolean_token(token).ok_or_else(incompatible)?;
            fill_bool_nulls(series, b)?
        }

        (DtypeCategory::Integer, FillValue::Int(i)) => fill_int_nulls(series, *i)?,
        (DtypeCategory::Integer, FillValue::Bool(b)) => fill_int_nulls(series, i64::from(*b))?,
        (DtypeCategory::Integer | DtypeCategory::Float, FillValue::Float(f)) => {
            fill_float_nulls(series, *f)?
        }
        (DtypeCategory::Float, FillValue::Int(i)) => fill_float_nulls(series, *i as f64)?,
        (DtypeCategory::Float, FillValue::Bool(b)) => {
            fill_float_nulls(series, f64::from(u8::from(*b)))?
        }

        (DtypeCategory::Null, FillValue::Bool(b)) => fill_bool_nulls(series, *b)?,
        (DtypeCategory::Null, FillValue::Int(i)) => fill_int_nulls(series, *i)?,
        (DtypeCategory::Null, FillValue::Float(f)) => fill_float_nulls(series, *f)?,
        (DtypeCategory::Null, FillValue::Text(s)) => fill_string_nulls(series, s)?,

        _ => return Err(incompatible()),
    };
    Ok(filled)
}
