//! Transformers: the units a cleaning pipeline is assembled from.
//!
//! Every transformer follows the same two-phase contract:
//!
//! 1. [`Transformer::fit`] inspects the table (and optional labels) and
//!    returns the transformer itself, ready to transform.
//! 2. [`Transformer::transform`] produces a new table. The argument is never
//!    modified.
//!
//! None of the transformers in this crate learn anything during `fit`; their
//! behaviour is fully determined by construction-time configuration, which is
//! immutable. This keeps them `Send + Sync` and shareable between runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use listing_cleaner::transformers::{ColumnDropper, Transformer};
//!
//! let dropper = ColumnDropper::new(["url", "postCode"]);
//! let cleaned = dropper.fit(&df, None)?.transform(&df)?;
//! ```

mod columns;
mod duplicates;
mod encoding;
mod missing;
mod rooms;

pub use columns::ColumnDropper;
pub use duplicates::DuplicateRowDropper;
pub use encoding::{BooleanEncoder, DEFAULT_FALSE_TOKEN, DEFAULT_TRUE_TOKEN, StringNormalizer};
pub use missing::{FillStrategy, FillValue, RowFilterOnMissing, ValueReplacer};
pub use rooms::{DerivedRoomCountFiller, ROOM_FLAG_COLUMNS};

use crate::error::Result;
use polars::prelude::*;

/// A unit of table transformation with a fit/transform contract.
pub trait Transformer: Send + Sync {
    /// Short snake_case identifier of the transformer type.
    fn kind(&self) -> &'static str;

    /// Prepare the transformer for `table`; returns the transformer itself.
    fn fit(&self, table: &DataFrame, labels: Option<&Series>) -> Result<&dyn Transformer>;

    /// Produce the transformed table.
    fn transform(&self, table: &DataFrame) -> Result<DataFrame>;

    /// [`fit`](Self::fit) followed by [`transform`](Self::transform) on the same table.
    fn fit_transform(&self, table: &DataFrame, labels: Option<&Series>) -> Result<DataFrame> {
        self.fit(table, labels)?.transform(table)
    }
}

static_assertions::assert_obj_safe!(Transformer);

/// Normalize a column argument given as a single name or a list of names.
pub(crate) fn owned_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}
