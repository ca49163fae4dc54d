//! Configuration types for the cleaning pipeline.
//!
//! A [`CleaningConfig`] is the declarative form of a pipeline: an ordered
//! list of named stages, each naming a transformer kind and its parameters.
//! It can be assembled with the fluent [`CleaningConfigBuilder`] or read from
//! JSON, and is turned into a runnable [`Pipeline`](crate::Pipeline) with
//! [`Pipeline::from_config`](crate::Pipeline::from_config).
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "stages": [
//!     { "name": "drop_duplicates", "kind": "drop_duplicates", "subset": ["id"] },
//!     { "name": "drop_price_na", "kind": "drop_missing", "columns": ["price"] },
//!     { "name": "replace_na_mean", "kind": "replace_missing",
//!       "columns": ["bedroomCount"], "strategy": "mean" }
//!   ]
//! }
//! ```

use crate::error::{CleaningError, Result};
use crate::presets;
use crate::transformers::{
    BooleanEncoder, ColumnDropper, DerivedRoomCountFiller, DuplicateRowDropper, FillStrategy,
    RowFilterOnMissing, StringNormalizer, Transformer, ValueReplacer,
};
use crate::transformers::{DEFAULT_FALSE_TOKEN, DEFAULT_TRUE_TOKEN};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Transformer kind and parameters of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformerSpec {
    /// [`ColumnDropper`]
    DropColumns { columns: Vec<String> },

    /// [`RowFilterOnMissing`]; an empty list checks every column.
    DropMissing {
        #[serde(default)]
        columns: Vec<String>,
    },

    /// [`ValueReplacer`]
    ReplaceMissing {
        columns: Vec<String>,
        strategy: FillStrategy,
    },

    /// [`DuplicateRowDropper`]; an empty subset compares whole rows.
    DropDuplicates {
        #[serde(default)]
        subset: Vec<String>,
    },

    /// [`StringNormalizer`]
    NormalizeStrings,

    /// [`BooleanEncoder`]
    EncodeBooleans {
        #[serde(default = "default_true_token")]
        true_token: String,
        #[serde(default = "default_false_token")]
        false_token: String,
    },

    /// [`DerivedRoomCountFiller`]
    FillRoomCount,
}

fn default_true_token() -> String {
    DEFAULT_TRUE_TOKEN.to_string()
}

fn default_false_token() -> String {
    DEFAULT_FALSE_TOKEN.to_string()
}

impl TransformerSpec {
    /// Default-token boolean encoding.
    pub fn encode_booleans() -> Self {
        Self::EncodeBooleans {
            true_token: default_true_token(),
            false_token: default_false_token(),
        }
    }

    /// Instantiate the transformer this spec describes.
    pub fn build(&self) -> Arc<dyn Transformer> {
        match self {
            Self::DropColumns { columns } => Arc::new(ColumnDropper::new(columns.clone())),
            Self::DropMissing { columns } => Arc::new(RowFilterOnMissing::new(columns.clone())),
            Self::ReplaceMissing { columns, strategy } => {
                Arc::new(ValueReplacer::new(columns.clone(), strategy.clone()))
            }
            Self::DropDuplicates { subset } => Arc::new(DuplicateRowDropper::new(subset.clone())),
            Self::NormalizeStrings => Arc::new(StringNormalizer::new()),
            Self::EncodeBooleans {
                true_token,
                false_token,
            } => Arc::new(BooleanEncoder::with_tokens(
                true_token.clone(),
                false_token.clone(),
            )),
            Self::FillRoomCount => Arc::new(DerivedRoomCountFiller::new()),
        }
    }
}

/// A named pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    #[serde(flatten)]
    pub transformer: TransformerSpec,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, transformer: TransformerSpec) -> Self {
        Self {
            name: name.into(),
            transformer,
        }
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to assemble stages in code, or
/// [`CleaningConfig::from_json_file`] to load them.
///
/// # Example
///
/// ```rust,ignore
/// use listing_cleaner::config::{CleaningConfig, TransformerSpec};
///
/// let config = CleaningConfig::builder()
///     .drop_duplicates("drop_duplicates", ["id"])
///     .drop_missing("drop_price_na", ["price"])
///     .stage("prepare_strings", TransformerSpec::NormalizeStrings)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Stages in execution order.
    pub stages: Vec<StageSpec>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self::real_estate()
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// The real-estate listing stages.
    pub fn real_estate() -> Self {
        Self {
            stages: presets::real_estate_stages(),
        }
    }

    /// The real-estate stages followed by room-count derivation, string
    /// normalization and boolean encoding.
    pub fn real_estate_encoded() -> Self {
        let mut stages = presets::real_estate_stages();
        stages.extend(presets::encoding_stages());
        Self { stages }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CleaningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name.as_str()).collect()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.stages.is_empty() {
            return Err(ConfigValidationError::NoStages);
        }

        let mut seen = HashSet::new();
        for (index, stage) in self.stages.iter().enumerate() {
            if stage.name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyStageName(index));
            }
            if !seen.insert(stage.name.as_str()) {
                return Err(ConfigValidationError::DuplicateStageName(stage.name.clone()));
            }

            match &stage.transformer {
                TransformerSpec::DropColumns { columns }
                | TransformerSpec::ReplaceMissing { columns, .. }
                    if columns.is_empty() =>
                {
                    return Err(ConfigValidationError::EmptyColumnList(stage.name.clone()));
                }
                TransformerSpec::EncodeBooleans {
                    true_token,
                    false_token,
                } if true_token.is_empty() || false_token.is_empty() || true_token == false_token => {
                    return Err(ConfigValidationError::InvalidBooleanTokens {
                        stage: stage.name.clone(),
                        true_token: true_token.clone(),
                        false_token: false_token.clone(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Configuration has no stages")]
    NoStages,

    #[error("Stage at position {0} has an empty name")]
    EmptyStageName(usize),

    #[error("Duplicate stage name '{0}'")]
    DuplicateStageName(String),

    #[error("Stage '{0}' must list at least one column")]
    EmptyColumnList(String),

    #[error(
        "Stage '{stage}' has invalid boolean tokens '{true_token}'/'{false_token}' (must be non-empty and distinct)"
    )]
    InvalidBooleanTokens {
        stage: String,
        true_token: String,
        false_token: String,
    },
}

impl From<ConfigValidationError> for CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    stages: Vec<StageSpec>,
}

impl CleaningConfigBuilder {
    /// Append a stage.
    pub fn stage(mut self, name: impl Into<String>, transformer: TransformerSpec) -> Self {
        self.stages.push(StageSpec::new(name, transformer));
        self
    }

    /// Append several stages.
    pub fn stages(mut self, stages: impl IntoIterator<Item = StageSpec>) -> Self {
        self.stages.extend(stages);
        self
    }

    /// Append a column-dropping stage.
    pub fn drop_columns<I, S>(self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.stage(name, TransformerSpec::DropColumns { columns })
    }

    /// Append a stage dropping rows with missing values in `columns`.
    pub fn drop_missing<I, S>(self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.stage(name, TransformerSpec::DropMissing { columns })
    }

    /// Append a missing-value replacement stage.
    pub fn replace_missing<I, S>(
        self,
        name: impl Into<String>,
        columns: I,
        strategy: FillStrategy,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.stage(name, TransformerSpec::ReplaceMissing { columns, strategy })
    }

    /// Append a duplicate-row removal stage.
    pub fn drop_duplicates<I, S>(self, name: impl Into<String>, subset: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subset = subset.into_iter().map(Into::into).collect();
        self.stage(name, TransformerSpec::DropDuplicates { subset })
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            stages: self.stages,
        };
        config.validate()?;
        Ok(config)
    }
}
