//! Shared utilities for the cleaning transformers.
//!
//! This module contains the dtype classification and null-filling helpers
//! that several transformers rely on.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for cleaning purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer numbers
    Integer,
    /// Floating point numbers
    Float,
    /// Boolean type
    Boolean,
    /// String/text type
    Text,
    /// Column holding nothing but nulls
    Null,
    /// Other/unknown types
    Other,
}

impl DtypeCategory {
    /// Integer or float.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_integer_dtype(dtype) {
        DtypeCategory::Integer
    } else if is_numeric_dtype(dtype) {
        DtypeCategory::Float
    } else {
        match dtype {
            DataType::Boolean => DtypeCategory::Boolean,
            DataType::String => DtypeCategory::Text,
            DataType::Null => DtypeCategory::Null,
            _ => DtypeCategory::Other,
        }
    }
}

/// Get the dtype category of a Series.
pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

// =============================================================================
// Boolean Token Utilities
// =============================================================================

/// Common boolean true representations.
pub const BOOLEAN_TRUE_VALUES: [&str; 5] = ["true", "yes", "1", "t", "y"];

/// Common boolean false representations.
pub const BOOLEAN_FALSE_VALUES: [&str; 5] = ["false", "no", "0", "f", "n"];

/// Check if a string represents a boolean true value.
pub fn is_boolean_true(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    BOOLEAN_TRUE_VALUES.iter().any(|&v| v == lower)
}

/// Check if a string represents a boolean false value.
pub fn is_boolean_false(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    BOOLEAN_FALSE_VALUES.iter().any(|&v| v == lower)
}

/// Parse a boolean token, case-insensitively.
pub fn parse_boolean_token(s: &str) -> Option<bool> {
    if is_boolean_true(s) {
        Some(true)
    } else if is_boolean_false(s) {
        Some(false)
    } else {
        None
    }
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a float, producing `Float64`.
pub fn fill_float_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in an integer Series, producing `Int64`.
pub fn fill_int_nulls(series: &Series, fill_value: i64) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::Int64)?;
    let values: Vec<i64> = casted
        .i64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a boolean Series.
pub fn fill_bool_nulls(series: &Series, fill_value: bool) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::Boolean)?;
    let values: Vec<bool> = casted
        .bool()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::String)?;
    let values: Vec<String> = casted
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Read a numeric Series as `f64` values, keeping nulls.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

// =============================================================================
// Tests
// =============================================================================
