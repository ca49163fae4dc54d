//! Pipeline module.
//!
//! This module provides the cleaning pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder, Stage};
pub use progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate, StageStatus};
