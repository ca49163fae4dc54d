//! The cleaning pipeline and its builder.

use crate::config::{CleaningConfig, ConfigValidationError, StageSpec};
use crate::error::Result;
use crate::pipeline::progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
use crate::reporting::MissingValueReport;
use crate::transformers::Transformer;
use crate::types::{CleaningResult, CleaningSummary, StageSummary};
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// A named pipeline stage.
#[derive(Clone)]
pub struct Stage {
    name: String,
    transformer: Arc<dyn Transformer>,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transformer(&self) -> &dyn Transformer {
        self.transformer.as_ref()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("kind", &self.transformer.kind())
            .finish()
    }
}

/// An ordered chain of named transformers.
///
/// Each run feeds the input table through every stage in order: `fit` then
/// `transform` on the previous stage's output. The first failing stage aborts
/// the run and its error comes back wrapped in
/// [`CleaningError::StageFailed`](crate::CleaningError::StageFailed). The
/// caller's table is never modified and a pipeline can be run any number of
/// times, from any number of threads.
///
/// # Example
///
/// ```rust,ignore
/// use listing_cleaner::{CleaningConfig, Pipeline};
/// use listing_cleaner::transformers::{DuplicateRowDropper, RowFilterOnMissing};
/// use std::sync::Arc;
///
/// // From the real-estate preset
/// let pipeline = Pipeline::from_config(&CleaningConfig::real_estate())?;
/// let cleaned = pipeline.run(&listings)?;
///
/// // Assembled by hand
/// let pipeline = Pipeline::builder()
///     .stage("drop_duplicates", Arc::new(DuplicateRowDropper::new(["id"])))
///     .stage("drop_price_na", Arc::new(RowFilterOnMissing::for_column("price")))
///     .build()?;
/// ```
pub struct Pipeline {
    stages: Vec<Stage>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Build a pipeline from a validated configuration.
    pub fn from_config(config: &CleaningConfig) -> std::result::Result<Self, ConfigValidationError> {
        Self::builder().stages_from(config).build()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Run every stage and return the cleaned table.
    pub fn run(&self, table: &DataFrame) -> Result<DataFrame> {
        self.execute(table, None, None)
    }

    /// Like [`run`](Self::run), passing `labels` to every stage's `fit`.
    pub fn run_with_labels(&self, table: &DataFrame, labels: &Series) -> Result<DataFrame> {
        self.execute(table, Some(labels), None)
    }

    /// Run every stage and summarize what each one did.
    pub fn process(&self, table: &DataFrame) -> Result<CleaningResult> {
        let start_time = Instant::now();
        let mut stages = Vec::with_capacity(self.stages.len());

        let cleaned = self.execute(table, None, Some(&mut stages))?;

        let summary = CleaningSummary {
            duration_ms: start_time.elapsed().as_millis() as u64,
            rows_before: table.height(),
            rows_after: cleaned.height(),
            columns_before: table.width(),
            columns_after: cleaned.width(),
            stages,
            missing_after: MissingValueReport::from_table(&cleaned),
        };

        Ok(CleaningResult {
            table: cleaned,
            summary,
        })
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn execute(
        &self,
        table: &DataFrame,
        labels: Option<&Series>,
        mut summaries: Option<&mut Vec<StageSummary>>,
    ) -> Result<DataFrame> {
        let stage_count = self.stages.len();
        info!(
            "Starting cleaning pipeline: {} stages, {} rows x {} columns",
            stage_count,
            table.height(),
            table.width()
        );

        let mut current = table.clone();
        for (index, stage) in self.stages.iter().enumerate() {
            let shape = current.shape();
            self.report_progress(ProgressUpdate::started(&stage.name, index, stage_count, shape));
            let stage_start = Instant::now();

            let output = match stage
                .transformer
                .fit(&current, labels)
                .and_then(|fitted| fitted.transform(&current))
            {
                Ok(output) => output,
                Err(e) => {
                    let e = e.in_stage(&stage.name);
                    error!("Pipeline error: {}", e);
                    self.report_progress(ProgressUpdate::failed(
                        &stage.name,
                        index,
                        stage_count,
                        shape,
                        e.to_string(),
                    ));
                    return Err(e);
                }
            };

            debug!(
                "Stage '{}' ({}): {:?} -> {:?}",
                stage.name,
                stage.transformer.kind(),
                shape,
                output.shape()
            );
            self.report_progress(ProgressUpdate::completed(
                &stage.name,
                index,
                stage_count,
                output.shape(),
            ));

            if let Some(summaries) = summaries.as_deref_mut() {
                summaries.push(StageSummary {
                    name: stage.name.clone(),
                    kind: stage.transformer.kind().to_string(),
                    rows_before: shape.0,
                    rows_after: output.height(),
                    columns_before: shape.1,
                    columns_after: output.width(),
                    duration_ms: stage_start.elapsed().as_millis() as u64,
                });
            }

            current = output;
        }

        info!(
            "Cleaning pipeline finished: {} rows x {} columns",
            current.height(),
            current.width()
        );
        Ok(current)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("progress_reporter", &self.progress_reporter.is_some())
            .finish()
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Stage>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Append a stage.
    pub fn stage(mut self, name: impl Into<String>, transformer: Arc<dyn Transformer>) -> Self {
        self.stages.push(Stage {
            name: name.into(),
            transformer,
        });
        self
    }

    /// Append one stage per [`StageSpec`].
    pub fn stage_specs<'a>(mut self, specs: impl IntoIterator<Item = &'a StageSpec>) -> Self {
        for spec in specs {
            self = self.stage(spec.name.clone(), spec.transformer.build());
        }
        self
    }

    /// Append every stage of a configuration.
    pub fn stages_from(self, config: &CleaningConfig) -> Self {
        self.stage_specs(&config.stages)
    }

    /// Set a progress reporter for receiving stage events.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let pipeline = Pipeline::builder()
    ///     .stages_from(&config)
    ///     .on_progress(|update| {
    ///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
    ///     })
    ///     .build()?;
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if there are no stages or a stage name is empty or
    /// repeated.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
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
        }

        Ok(Pipeline {
            stages: self.stages,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleaningError;
    use crate::pipeline::progress::StageStatus;
    use crate::transformers::{ColumnDropper, RowFilterOnMissing, StringNormalizer};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn listings() -> DataFrame {
        df![
            "id" => [1i64, 2, 3],
            "url" => ["a", "b", "c"],
            "price" => [Some(100.0), None, Some(300.0)],
            "kitchenType" => [Some("installed"), Some("semi"), None],
        ]
        .unwrap()
    }

    fn two_stage() -> Pipeline {
        Pipeline::builder()
            .stage("drop_columns", Arc::new(ColumnDropper::new(["url"])))
            .stage("drop_price_na", Arc::new(RowFilterOnMissing::for_column("price")))
            .build()
            .unwrap()
    }

    /// Records the order in which `fit` and `transform` are called.
    struct Recorder {
        label: &'static str,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Transformer for Recorder {
        fn kind(&self) -> &'static str {
            "recorder"
        }

        fn fit(&self, _table: &DataFrame, labels: Option<&Series>) -> Result<&dyn Transformer> {
            let with_labels = if labels.is_some() { "+labels" } else { "" };
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}.fit{}", self.label, with_labels));
            Ok(self)
        }

        fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}.transform", self.label));
            Ok(table.clone())
        }
    }

    #[test]
    fn test_run_applies_stages_in_order() {
        let out = two_stage().run(&listings()).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(out.width(), 3);
        assert_eq!(out.column("price").unwrap().null_count(), 0);
    }

    #[test]
    fn test_fit_then_transform_per_stage() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage("a", Arc::new(Recorder { label: "a", calls: calls.clone() }))
            .stage("b", Arc::new(Recorder { label: "b", calls: calls.clone() }))
            .build()
            .unwrap();

        let labels = Series::new("price".into(), [1.0, 2.0, 3.0]);
        pipeline.run_with_labels(&listings(), &labels).unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["a.fit+labels", "a.transform", "b.fit+labels", "b.transform"]
        );
    }

    #[test]
    fn test_failure_names_stage_and_stops() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage("prepare_strings", Arc::new(StringNormalizer::new()))
            .stage("after", Arc::new(Recorder { label: "after", calls: calls.clone() }))
            .build()
            .unwrap();

        let err = pipeline.run(&listings()).unwrap_err();

        assert!(matches!(err, CleaningError::StageFailed { ref stage, .. } if stage == "prepare_strings"));
        assert!(matches!(err.root(), CleaningError::Precondition { .. }));
        assert_eq!(err.column(), Some("kitchenType"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_input_table_unchanged() {
        let table = listings();
        let before = table.clone();
        two_stage().run(&table).unwrap();
        assert!(table.equals_missing(&before));
    }

    #[test]
    fn test_process_summarizes_stages() {
        let result = two_stage().process(&listings()).unwrap();
        let summary = &result.summary;

        assert_eq!(summary.rows_before, 3);
        assert_eq!(summary.rows_after, 2);
        assert_eq!(summary.columns_removed(), 1);
        assert_eq!(summary.stages.len(), 2);
        assert_eq!(summary.stages[0].kind, "column_dropper");
        assert_eq!(summary.stages[0].columns_after, 3);
        assert_eq!(summary.stages[1].rows_removed(), 1);
        assert_eq!(summary.missing_after.missing_in("kitchenType"), Some(1));
    }

    #[test]
    fn test_builder_rejects_bad_names() {
        let empty = Pipeline::builder().build();
        assert!(matches!(empty, Err(ConfigValidationError::NoStages)));

        let duplicate = Pipeline::builder()
            .stage("clean", Arc::new(StringNormalizer::new()))
            .stage("clean", Arc::new(StringNormalizer::new()))
            .build();
        assert!(matches!(duplicate, Err(ConfigValidationError::DuplicateStageName(_))));

        let unnamed = Pipeline::builder()
            .stage("", Arc::new(StringNormalizer::new()))
            .build();
        assert!(matches!(unnamed, Err(ConfigValidationError::EmptyStageName(0))));
    }

    #[test]
    fn test_from_config_uses_stage_names() {
        let pipeline = Pipeline::from_config(&CleaningConfig::real_estate_encoded()).unwrap();
        let names = pipeline.stage_names();
        assert_eq!(names.first(), Some(&"drop_duplicates"));
        assert_eq!(names.last(), Some(&"boolean_transformer"));
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_progress_events() {
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let statuses_clone = statuses.clone();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        let pipeline = Pipeline::builder()
            .stage("drop_columns", Arc::new(ColumnDropper::new(["url"])))
            .stage("prepare_strings", Arc::new(StringNormalizer::new()))
            .on_progress(move |update| {
                count_clone.fetch_add(1, Ordering::SeqCst);
                statuses_clone
                    .lock()
                    .unwrap()
                    .push((update.stage, update.status));
            })
            .build()
            .unwrap();

        assert!(pipeline.run(&listings()).is_err());

        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(
            *statuses.lock().unwrap(),
            vec![
                ("drop_columns".to_string(), StageStatus::Started),
                ("drop_columns".to_string(), StageStatus::Completed),
                ("prepare_strings".to_string(), StageStatus::Started),
                ("prepare_strings".to_string(), StageStatus::Failed),
            ]
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let pipeline = Arc::new(two_stage());
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let pipeline = pipeline.clone();
                std::thread::spawn(move || pipeline.run(&listings()).unwrap().height())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    }
}
