//! Column lists and stage order for real-estate listing data.
//!
//! These are plain data; the transformers never refer to them directly.

use crate::config::{StageSpec, TransformerSpec};
use crate::transformers::{FillStrategy, FillValue};

/// Columns removed before imputation: identifiers, location detail, columns
/// redundant with others, columns with too many missing values and columns
/// poorly correlated with price.
pub const DROP_COLUMNS: [&str; 18] = [
    "Unnamed: 0",
    "id",
    "url",
    "postCode",
    "province",
    "locality",
    "monthlyCost",
    "hasBalcony",
    "accessibleDisabledPeople",
    // gardenSurface carries the same information
    "hasGarden",
    "gardenOrientation",
    "diningRoomSurface",
    "terraceOrientation",
    "parkingCountIndoor",
    "parkingCountOutdoor",
    "floorCount",
    "streetFacadeWidth",
    "kitchenSurface",
];

/// Feature flags where a missing value means the feature is absent.
pub const BOOLEAN_FILL_COLUMNS: [&str; 16] = [
    "hasTerrace",
    "hasLivingRoom",
    "hasBasement",
    "hasLift",
    "hasVisiophone",
    "hasDiningRoom",
    "hasAttic",
    "hasOffice",
    "hasPhotovoltaicPanels",
    "hasHeatPump",
    "hasArmoredDoor",
    "hasThermicPanels",
    "hasFireplace",
    "hasDressingRoom",
    "hasSwimmingPool",
    "hasAirConditioning",
];

/// Fill literal for [`BOOLEAN_FILL_COLUMNS`].
pub const BOOLEAN_FILL_VALUE: &str = "False";

/// Surfaces where a missing value means the space does not exist.
pub const NUMERIC_FILL_COLUMNS: [&str; 3] = ["gardenSurface", "livingRoomSurface", "terraceSurface"];

/// Fill literal for [`NUMERIC_FILL_COLUMNS`].
pub const NUMERIC_FILL_VALUE: f64 = 0.0;

pub const KITCHEN_TYPE_COLUMN: &str = "kitchenType";

/// A listing without a kitchen type has no kitchen.
pub const KITCHEN_TYPE_FILL_VALUE: &str = "NOT_INSTALLED";

/// Columns imputed with their own mean.
pub const MEAN_FILL_COLUMNS: [&str; 3] = ["bedroomCount", "habitableSurface", "bathroomCount"];

/// Rows without a price are useless downstream.
pub const PRICE_COLUMN: &str = "price";

/// Listings are identified by this column.
pub const ID_COLUMN: &str = "id";

fn names(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Stages of the standard listing cleaning run, in order.
pub fn real_estate_stages() -> Vec<StageSpec> {
    vec![
        StageSpec::new(
            "drop_duplicates",
            TransformerSpec::DropDuplicates {
                subset: names(&[ID_COLUMN]),
            },
        ),
        StageSpec::new(
            "drop_columns",
            TransformerSpec::DropColumns {
                columns: names(&DROP_COLUMNS),
            },
        ),
        StageSpec::new(
            "drop_price_na",
            TransformerSpec::DropMissing {
                columns: names(&[PRICE_COLUMN]),
            },
        ),
        StageSpec::new(
            "replace_na_bools",
            TransformerSpec::ReplaceMissing {
                columns: names(&BOOLEAN_FILL_COLUMNS),
                strategy: FillStrategy::Value(FillValue::from(BOOLEAN_FILL_VALUE)),
            },
        ),
        StageSpec::new(
            "replace_na_numerics",
            TransformerSpec::ReplaceMissing {
                columns: names(&NUMERIC_FILL_COLUMNS),
                strategy: FillStrategy::Value(FillValue::Float(NUMERIC_FILL_VALUE)),
            },
        ),
        StageSpec::new(
            "replace_kitchen_type_na",
            TransformerSpec::ReplaceMissing {
                columns: names(&[KITCHEN_TYPE_COLUMN]),
                strategy: FillStrategy::Value(FillValue::from(KITCHEN_TYPE_FILL_VALUE)),
            },
        ),
        StageSpec::new(
            "replace_na_mean",
            TransformerSpec::ReplaceMissing {
                columns: names(&MEAN_FILL_COLUMNS),
                strategy: FillStrategy::Mean,
            },
        ),
    ]
}

/// Stages that turn the cleaned listing table into model-ready values.
///
/// String normalization requires every text column to be free of nulls;
/// the standard stages do not guarantee that for every dataset.
pub fn encoding_stages() -> Vec<StageSpec> {
    vec![
        StageSpec::new("room_count_replace_na", TransformerSpec::FillRoomCount),
        StageSpec::new("prepare_strings", TransformerSpec::NormalizeStrings),
        StageSpec::new("boolean_transformer", TransformerSpec::encode_booleans()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformers::ROOM_FLAG_COLUMNS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stage_order() {
        let names: Vec<String> = real_estate_stages().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "drop_duplicates",
                "drop_columns",
                "drop_price_na",
                "replace_na_bools",
                "replace_na_numerics",
                "replace_kitchen_type_na",
                "replace_na_mean",
            ]
        );
    }

    #[test]
    fn test_room_flags_are_filled_before_room_count() {
        for flag in ROOM_FLAG_COLUMNS {
            assert!(BOOLEAN_FILL_COLUMNS.contains(&flag), "{flag} is never filled");
        }
    }

    #[test]
    fn test_dropped_columns_are_not_imputed() {
        for column in DROP_COLUMNS {
            assert!(!BOOLEAN_FILL_COLUMNS.contains(&column));
            assert!(!NUMERIC_FILL_COLUMNS.contains(&column));
            assert!(!MEAN_FILL_COLUMNS.contains(&column));
        }
    }
}
