//! Custom error types for the cleaning pipeline.
//!
//! Every transformer reports failures through [`CleaningError`]. The three
//! contract violations a stage can raise are [`CleaningError::Schema`],
//! [`CleaningError::Precondition`] and [`CleaningError::InvalidOperation`];
//! the [`Pipeline`](crate::Pipeline) wraps whichever one occurs in
//! [`CleaningError::StageFailed`] so the caller also learns which stage
//! aborted the run.
//!
//! Errors are serializable so they can be embedded in JSON run reports.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// A referenced column is absent from the table.
    #[error("Column '{column}' not found in table")]
    Schema { column: String },

    /// A transformer's input invariant is violated.
    #[error("Precondition violated for column '{column}': {reason}")]
    Precondition { column: String, reason: String },

    /// The requested operation is undefined for the data at hand.
    #[error("Invalid operation on column '{column}': {reason}")]
    InvalidOperation { column: String, reason: String },

    /// A pipeline stage failed; `source` is the stage's own error.
    #[error("Stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: Box<CleaningError>,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Shorthand for [`CleaningError::Schema`].
    pub fn schema(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }

    /// Shorthand for [`CleaningError::Precondition`].
    pub fn precondition(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`CleaningError::InvalidOperation`].
    pub fn invalid_operation(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Attribute this error to a named pipeline stage.
    pub fn in_stage(self, stage: impl Into<String>) -> Self {
        CleaningError::StageFailed {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for report consumers.
    ///
    /// Wrapper variants report the code of the error they wrap, so a stage
    /// failure caused by a missing column is still `SCHEMA_ERROR`.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::Precondition { .. } => "PRECONDITION_ERROR",
            Self::InvalidOperation { .. } => "INVALID_OPERATION",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::StageFailed { source, .. } => source.error_code(),
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Name of the stage that failed, if this error came out of a pipeline run.
    pub fn failed_stage(&self) -> Option<&str> {
        match self {
            Self::StageFailed { stage, .. } => Some(stage.as_str()),
            Self::WithContext { source, .. } => source.failed_stage(),
            _ => None,
        }
    }

    /// The innermost error, with stage and context wrappers peeled off.
    pub fn root(&self) -> &CleaningError {
        match self {
            Self::StageFailed { source, .. } | Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Column the violated contract refers to, if any.
    pub fn column(&self) -> Option<&str> {
        match self.root() {
            Self::Schema { column }
            | Self::Precondition { column, .. }
            | Self::InvalidOperation { column, .. } => Some(column.as_str()),
            _ => None,
        }
    }
}

/// Errors are serialized as a struct with `code`, `message` and, for stage
/// failures, `stage` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("stage", &self.failed_stage())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
