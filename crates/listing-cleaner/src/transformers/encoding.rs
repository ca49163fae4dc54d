//! Value encoding: string normalization and boolean encoding.

use super::Transformer;
use crate::error::{CleaningError, Result};
use crate::table::text_columns;
use crate::utils::{DtypeCategory, series_dtype_category};
use polars::prelude::*;
use tracing::debug;

/// Token the boolean encoder maps to 1 by default.
pub const DEFAULT_TRUE_TOKEN: &str = "TRUE";
/// Token the boolean encoder maps to 0 by default.
pub const DEFAULT_FALSE_TOKEN: &str = "FALSE";

// =============================================================================
// StringNormalizer
// =============================================================================

/// Trims and upper-cases every text column.
///
/// Text columns must not contain nulls: callers place this stage after all
/// missing-value handling for text columns. A null fails the call with
/// [`CleaningError::Precondition`] naming the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringNormalizer;

impl StringNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for StringNormalizer {
    fn kind(&self) -> &'static str {
        "string_normalizer"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let columns = text_columns(table);

        // Validate everything first so a failure leaves no half-normalized copy behind.
        for name in &columns {
            let nulls = table.column(name)?.null_count();
            if nulls > 0 {
                return Err(CleaningError::precondition(
                    name.as_str(),
                    format!(
                        "column contains {} missing values; handle them before normalizing strings",
                        nulls
                    ),
                ));
            }
        }

        let mut out = table.clone();
        for name in &columns {
            let series = out.column(name)?.as_materialized_series();
            let normalized: Vec<String> = series
                .str()?
                .into_iter()
                .flatten()
                .map(|value| value.trim().to_uppercase())
                .collect();
            let normalized = Series::new(name.as_str().into(), normalized);
            out.replace(name, normalized)?;
        }

        debug!("Normalized {} text columns", columns.len());
        Ok(out)
    }
}

// =============================================================================
// BooleanEncoder
// =============================================================================

/// Encodes boolean-valued columns as 0/1 integers.
///
/// A text column is encoded when every non-missing value is either the true
/// or the false token (compared exactly, so run [`StringNormalizer`] first
/// for mixed-case data) and it has at least one non-missing value. Nulls
/// stay null; every other column is returned untouched.
///
/// Beyond the text rule, native `Boolean` columns are always encoded too.
/// The CSV reader infers `True`/`False` flag columns as booleans, and those
/// come out as the same 0/1 column their text form would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanEncoder {
    true_token: String,
    false_token: String,
}

impl Default for BooleanEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanEncoder {
    pub fn new() -> Self {
        Self::with_tokens(DEFAULT_TRUE_TOKEN, DEFAULT_FALSE_TOKEN)
    }

    pub fn with_tokens(true_token: impl Into<String>, false_token: impl Into<String>) -> Self {
        Self {
            true_token: true_token.into(),
            false_token: false_token.into(),
        }
    }

    pub fn true_token(&self) -> &str {
        &self.true_token
    }

    pub fn false_token(&self) -> &str {
        &self.false_token
    }

    /// Encoded values for a text column, or `None` when it is not boolean-valued.
    fn encode_text(&self, series: &Series) -> PolarsResult<Option<Vec<Option<i64>>>> {
        let values = series.str()?;
        if values.null_count() == values.len() {
            return Ok(None);
        }

        let mut encoded = Vec::with_capacity(values.len());
        for value in values.into_iter() {
            match value {
                None => encoded.push(None),
                Some(v) if v == self.true_token => encoded.push(Some(1)),
                Some(v) if v == self.false_token => encoded.push(Some(0)),
                Some(_) => return Ok(None),
            }
        }
        Ok(Some(encoded))
    }
}

impl Transformer for BooleanEncoder {
    fn kind(&self) -> &'static str {
        "boolean_encoder"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let mut out = table.clone();
        let mut encoded_columns = Vec::new();

        for column in table.get_columns() {
            let series = column.as_materialized_series();
            let encoded = match series_dtype_category(series) {
                DtypeCategory::Boolean => Some(series.cast(&DataType::Int64)?),
                DtypeCategory::Text => self
                    .encode_text(series)?
                    .map(|values| Series::new(series.name().clone(), values)),
                _ => None,
            };

            if let Some(encoded) = encoded {
                out.replace(series.name().as_str(), encoded)?;
                encoded_columns.push(series.name().to_string());
            }
        }

        debug!("Encoded boolean columns: {:?}", encoded_columns);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(table: &DataFrame, name: &str) -> Vec<Option<String>> {
        table
            .column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn ints(table: &DataFrame, name: &str) -> Vec<Option<i64>> {
        table
            .column(name)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    // ========================================================================
    // StringNormalizer
    // ========================================================================

    #[test]
    fn test_normalizer_trims_and_uppercases_text_columns() {
        let table = df![
            "kitchenType" => ["  installed", "Usa_Hyper_Equipped ", "semi_equipped"],
            "price" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        let out = StringNormalizer::new().fit_transform(&table, None).unwrap();

        assert_eq!(
            strings(&out, "kitchenType"),
            vec![
                Some("INSTALLED".to_string()),
                Some("USA_HYPER_EQUIPPED".to_string()),
                Some("SEMI_EQUIPPED".to_string()),
            ]
        );
        assert!(out.column("price").unwrap().equals(table.column("price").unwrap()));
    }

    #[test]
    fn test_normalizer_rejects_missing_text() {
        let table = df![
            "type" => [Some("house"), Some("apartment")],
            "heatingType" => [Some("gas"), None],
        ]
        .unwrap();

        let err = StringNormalizer::new().transform(&table).unwrap_err();

        assert!(matches!(err, CleaningError::Precondition { .. }));
        assert_eq!(err.column(), Some("heatingType"));
        // Input untouched.
        assert_eq!(strings(&table, "type")[0], Some("house".to_string()));
    }

    #[test]
    fn test_normalizer_ignores_nulls_in_numeric_columns() {
        let table = df![
            "type" => ["house"],
            "price" => [Option::<f64>::None],
        ]
        .unwrap();

        assert!(StringNormalizer::new().transform(&table).is_ok());
    }

    // ========================================================================
    // BooleanEncoder
    // ========================================================================

    #[test]
    fn test_encoder_maps_tokens_to_integers() {
        let table = df!["hasLift" => ["TRUE", "FALSE", "TRUE"]].unwrap();
        let out = BooleanEncoder::new().fit_transform(&table, None).unwrap();

        assert_eq!(out.column("hasLift").unwrap().dtype(), &DataType::Int64);
        assert_eq!(ints(&out, "hasLift"), vec![Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn test_encoder_leaves_other_text_untouched() {
        let table = df![
            "hasLift" => ["TRUE", "MAYBE"],
            "type" => ["HOUSE", "APARTMENT"],
        ]
        .unwrap();

        let out = BooleanEncoder::new().transform(&table).unwrap();

        assert_eq!(
            strings(&out, "hasLift"),
            vec![Some("TRUE".to_string()), Some("MAYBE".to_string())]
        );
        assert_eq!(out.column("type").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_encoder_is_case_sensitive() {
        let table = df!["hasLift" => ["True", "False"]].unwrap();
        let out = BooleanEncoder::new().transform(&table).unwrap();
        assert_eq!(out.column("hasLift").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_encoder_keeps_nulls_and_skips_all_null_columns() {
        let table = df![
            "hasAttic" => [Some("FALSE"), None],
            "hasOffice" => [Option::<&str>::None, None],
        ]
        .unwrap();

        let out = BooleanEncoder::new().transform(&table).unwrap();

        assert_eq!(ints(&out, "hasAttic"), vec![Some(0), None]);
        assert_eq!(out.column("hasOffice").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_encoder_encodes_native_booleans() {
        let table = df!["hasBasement" => [true, false]].unwrap();
        let out = BooleanEncoder::new().transform(&table).unwrap();
        assert_eq!(ints(&out, "hasBasement"), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_encoder_custom_tokens() {
        let table = df!["hasGarden" => ["YES", "NO"]].unwrap();
        let out = BooleanEncoder::with_tokens("YES", "NO")
            .transform(&table)
            .unwrap();
        assert_eq!(ints(&out, "hasGarden"), vec![Some(1), Some(0)]);
    }
}
