//! Run reporting.
//!
//! [`MissingValueReport`] counts the nulls left in a table, and
//! [`ReportGenerator`] writes a [`CleaningReport`] for a run to disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use listing_cleaner::reporting::{CleaningReport, ReportGenerator};
//!
//! let result = pipeline.process(&listings)?;
//! print!("{}", result.summary.missing_after);
//!
//! let report = CleaningReport::new("data/Kangaroo.csv", None, result.summary);
//! ReportGenerator::new("output").write_report(&report, "Kangaroo")?;
//! ```

mod generator;
mod missing;

pub use generator::{CleaningReport, ReportGenerator};
pub use missing::{ColumnMissing, MissingValueReport};
