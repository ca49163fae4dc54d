//! Real-Estate Listing Cleaning Library
//!
//! A cleaning pipeline for tabular real-estate listing data, built on Polars.
//!
//! # Overview
//!
//! A [`Pipeline`] is an ordered chain of named [`Transformer`]s. Each stage
//! fits on and transforms the previous stage's output; the caller's table is
//! never modified. The crate ships seven transformers:
//!
//! - **[`ColumnDropper`]**: removes a fixed list of columns
//! - **[`RowFilterOnMissing`]**: drops rows with nulls in the listed columns
//! - **[`ValueReplacer`]**: fills nulls with a literal or the column mean
//! - **[`DuplicateRowDropper`]**: keeps the first row per identity
//! - **[`StringNormalizer`]**: trims and upper-cases text columns
//! - **[`BooleanEncoder`]**: turns boolean-valued text columns into 0/1
//! - **[`DerivedRoomCountFiller`]**: fills `roomCount` from the other room columns
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use listing_cleaner::{CleaningConfig, Pipeline, loader};
//!
//! let listings = loader::load_table("data/Kangaroo.csv")?;
//!
//! let pipeline = Pipeline::from_config(&CleaningConfig::real_estate())?;
//! let result = pipeline.process(&listings)?;
//!
//! print!("{}", result.summary.missing_after);
//! loader::write_csv(&result.table, "output/Kangaroo_cleaned.csv")?;
//! ```
//!
//! # Configuration
//!
//! Stage lists are data. Assemble them with [`CleaningConfig::builder`],
//! load them from JSON, or start from the [`presets`]:
//!
//! ```rust,ignore
//! use listing_cleaner::config::{CleaningConfig, TransformerSpec};
//! use listing_cleaner::transformers::FillStrategy;
//!
//! let config = CleaningConfig::builder()
//!     .drop_duplicates("drop_duplicates", ["id"])
//!     .drop_missing("drop_price_na", ["price"])
//!     .replace_missing("replace_na_mean", ["bedroomCount"], FillStrategy::Mean)
//!     .stage("prepare_strings", TransformerSpec::NormalizeStrings)
//!     .build()?;
//! ```
//!
//! # Errors
//!
//! A failing stage aborts the run. The error names the stage and the
//! violated contract:
//!
//! ```rust,ignore
//! match pipeline.run(&listings) {
//!     Ok(cleaned) => println!("{} rows left", cleaned.height()),
//!     Err(e) => println!("{} failed: {}", e.failed_stage().unwrap_or("?"), e.root()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod presets;
pub mod reporting;
pub mod table;
pub mod transformers;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, StageSpec, TransformerSpec,
};
pub use error::{CleaningError, Result, ResultExt};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter, ProgressUpdate, Stage,
    StageStatus,
};
pub use reporting::{CleaningReport, MissingValueReport, ReportGenerator};
pub use transformers::{
    BooleanEncoder, ColumnDropper, DerivedRoomCountFiller, DuplicateRowDropper, FillStrategy,
    FillValue, RowFilterOnMissing, StringNormalizer, Transformer, ValueReplacer,
};
pub use types::{CleaningResult, CleaningSummary, StageSummary};
