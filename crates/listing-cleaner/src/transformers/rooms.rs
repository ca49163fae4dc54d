//! Room count derivation.

use super::Transformer;
use crate::error::{CleaningError, Result};
use crate::table::{has_column, require_column, with_replaced};
use crate::utils::{DtypeCategory, numeric_values, parse_boolean_token, series_dtype_category};
use polars::prelude::*;
use tracing::debug;

/// Room-presence flags counted as one room each.
pub const ROOM_FLAG_COLUMNS: [&str; 6] = [
    "hasLivingRoom",
    "hasDiningRoom",
    "hasOffice",
    "hasDressingRoom",
    "hasBasement",
    "hasAttic",
];

const BEDROOM_COUNT: &str = "bedroomCount";
const BATHROOM_COUNT: &str = "bathroomCount";
const ROOM_COUNT: &str = "roomCount";

/// Fills missing `roomCount` cells from the other room columns.
///
/// The derived count is `bedroomCount + bathroomCount` plus one for every
/// room flag that is set, rounded half to even. Present `roomCount` values
/// are never overwritten, and a table without `roomCount` comes back
/// unchanged once the inputs have been validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedRoomCountFiller;

impl DerivedRoomCountFiller {
    pub fn new() -> Self {
        Self
    }
}

struct RoomInput {
    name: &'static str,
    values: Vec<Option<f64>>,
}

fn count_input(table: &DataFrame, name: &'static str) -> Result<RoomInput> {
    let series = require_column(table, name)?;
    let category = series_dtype_category(series);
    if !category.is_numeric() && category != DtypeCategory::Null {
        return Err(CleaningError::precondition(
            name,
            format!("room counts must be numeric, found {}", series.dtype()),
        ));
    }
    Ok(RoomInput {
        name,
        values: numeric_values(series)?,
    })
}

fn flag_input(table: &DataFrame, name: &'static str) -> Result<RoomInput> {
    let series = require_column(table, name)?;
    let values = match series_dtype_category(series) {
        DtypeCategory::Boolean | DtypeCategory::Integer | DtypeCategory::Float | DtypeCategory::Null => {
            numeric_values(series)?
        }
        DtypeCategory::Text => {
            let mut values = Vec::with_capacity(series.len());
            for token in series.str()?.into_iter() {
                let value = match token {
                    None => None,
                    Some(token) => match parse_boolean_token(token) {
                        Some(flag) => Some(if flag { 1.0 } else { 0.0 }),
                        None => {
                            return Err(CleaningError::precondition(
                                name,
                                format!("'{}' is not a boolean value", token),
                            ));
                        }
                    },
                };
                values.push(value);
            }
            values
        }
        DtypeCategory::Other => {
            return Err(CleaningError::precondition(
                name,
                format!("room flags must be boolean, found {}", series.dtype()),
            ));
        }
    };
    Ok(RoomInput { name, values })
}

impl Transformer for DerivedRoomCountFiller {
    fn kind(&self) -> &'static str {
        "derived_room_count_filler"
    }

    fn fit(&self, _table: &DataFrame, _labels: Option<&Series>) -> Result<&dyn Transformer> {
        Ok(self)
    }

    fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let mut inputs = vec![
            count_input(table, BEDROOM_COUNT)?,
            count_input(table, BATHROOM_COUNT)?,
        ];
        for flag in ROOM_FLAG_COLUMNS {
            inputs.push(flag_input(table, flag)?);
        }

        if !has_column(table, ROOM_COUNT) {
            debug!("No '{}' column; nothing to fill", ROOM_COUNT);
            return Ok(table.clone());
        }
        let room_count = require_column(table, ROOM_COUNT)?;

        let target_dtype = match series_dtype_category(room_count) {
            DtypeCategory::Integer | DtypeCategory::Float => room_count.dtype().clone(),
            DtypeCategory::Null => DataType::Int64,
            _ => {
                return Err(CleaningError::precondition(
                    ROOM_COUNT,
                    format!("room count must be numeric, found {}", room_count.dtype()),
                ));
            }
        };

        let mut filled = numeric_values(room_count)?;
        let mut filled_rows = 0usize;
        for (row, cell) in filled.iter_mut().enumerate() {
            if cell.is_some() {
                continue;
            }
            let mut calculated = 0.0;
            for input in &inputs {
                match input.values[row] {
                    Some(value) => calculated += value,
                    None => {
                        return Err(CleaningError::precondition(
                            input.name,
                            format!("missing value in row {} needed to derive '{}'", row, ROOM_COUNT),
                        ));
                    }
                }
            }
            *cell = Some(calculated.round_ties_even());
            filled_rows += 1;
        }

        let filled = Series::new(ROOM_COUNT.into(), filled).cast(&target_dtype)?;
        debug!("Derived '{}' for {} rows", ROOM_COUNT, filled_rows);
        with_replaced(table, ROOM_COUNT, filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column_names;
    use pretty_assertions::assert_eq;

    fn listings(room_count: &[Option<i64>]) -> DataFrame {
        let n = room_count.len();
        df![
            "bedroomCount" => vec![2i64; n],
            "bathroomCount" => vec![1.0f64; n],
            "hasLivingRoom" => vec![true; n],
            "hasDiningRoom" => vec![true; n],
            "hasOffice" => vec![true; n],
            "hasDressingRoom" => vec![true; n],
            "hasBasement" => vec![true; n],
            "hasAttic" => vec![true; n],
            "roomCount" => room_count.to_vec(),
        ]
        .unwrap()
    }

    fn room_counts(table: &DataFrame) -> Vec<Option<i64>> {
        table
            .column("roomCount")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_fills_missing_room_count() {
        let table = listings(&[None]);
        let out = DerivedRoomCountFiller::new()
            .fit_transform(&table, None)
            .unwrap();

        assert_eq!(room_counts(&out), vec![Some(9)]);
        assert_eq!(column_names(&out), column_names(&table));
    }

    #[test]
    fn test_present_values_untouched() {
        let table = listings(&[Some(4), None]);
        let out = DerivedRoomCountFiller::new().transform(&table).unwrap();
        assert_eq!(room_counts(&out), vec![Some(4), Some(9)]);
    }

    #[test]
    fn test_text_flags_and_ties_to_even() {
        let table = df![
            "bedroomCount" => [1.5f64, 2.5],
            "bathroomCount" => [1.0f64, 1.0],
            "hasLivingRoom" => ["True", "False"],
            "hasDiningRoom" => ["False", "False"],
            "hasOffice" => ["False", "False"],
            "hasDressingRoom" => ["False", "False"],
            "hasBasement" => ["False", "False"],
            "hasAttic" => ["False", "False"],
            "roomCount" => [Option::<f64>::None, None],
        ]
        .unwrap();

        let out = DerivedRoomCountFiller::new().transform(&table).unwrap();
        let values: Vec<Option<f64>> = out
            .column("roomCount")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();

        // 3.5 -> 4, 3.5 -> 4
        assert_eq!(values, vec![Some(4.0), Some(4.0)]);
    }

    #[test]
    fn test_missing_input_in_filled_row() {
        let mut table = listings(&[Some(3), None]);
        table
            .replace("hasOffice", Series::new("hasOffice".into(), [Some(true), None]))
            .unwrap();

        let err = DerivedRoomCountFiller::new().transform(&table).unwrap_err();
        assert!(matches!(err, CleaningError::Precondition { .. }));
        assert_eq!(err.column(), Some("hasOffice"));
    }

    #[test]
    fn test_absent_input_is_schema_error_without_room_count() {
        let table = listings(&[None]).drop("roomCount").unwrap().drop("hasAttic").unwrap();
        let err = DerivedRoomCountFiller::new().transform(&table).unwrap_err();
        assert!(matches!(err, CleaningError::Schema { ref column } if column == "hasAttic"));
    }

    #[test]
    fn test_without_room_count_returns_table_unchanged() {
        let table = listings(&[None]).drop("roomCount").unwrap();
        let out = DerivedRoomCountFiller::new().transform(&table).unwrap();
        assert!(out.equals_missing(&table));
    }
}
