//! Progress reporting for pipeline runs.
//!
//! The pipeline emits one [`ProgressUpdate`] when a stage starts and one when
//! it completes or fails. Reporters receive them synchronously on the thread
//! running the pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use listing_cleaner::{CleaningConfig, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .stages_from(&CleaningConfig::real_estate())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle state of a stage within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage is about to fit and transform its input
    Started,
    /// The stage produced its output
    Completed,
    /// The stage failed and the run is aborted
    Failed,
}

impl StageStatus {
    /// Returns a human-readable name for the status.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// A single progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Name of the stage the event is about
    pub stage: String,

    /// Zero-based position of the stage
    pub stage_index: usize,

    /// Number of stages in the pipeline
    pub stage_count: usize,

    pub status: StageStatus,

    /// Overall progress (0.0 - 1.0), counting completed stages
    pub progress: f32,

    /// Table height at the time of the event
    pub rows: usize,

    /// Table width at the time of the event
    pub columns: usize,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    fn new(
        stage: &str,
        stage_index: usize,
        stage_count: usize,
        status: StageStatus,
        shape: (usize, usize),
        message: String,
    ) -> Self {
        let done = match status {
            StageStatus::Completed => stage_index + 1,
            StageStatus::Started | StageStatus::Failed => stage_index,
        };
        let progress = if stage_count > 0 {
            done as f32 / stage_count as f32
        } else {
            1.0
        };
        Self {
            stage: stage.to_string(),
            stage_index,
            stage_count,
            status,
            progress: progress.clamp(0.0, 1.0),
            rows: shape.0,
            columns: shape.1,
            message,
        }
    }

    /// A stage is starting on a table of the given shape.
    pub fn started(stage: &str, stage_index: usize, stage_count: usize, shape: (usize, usize)) -> Self {
        Self::new(
            stage,
            stage_index,
            stage_count,
            StageStatus::Started,
            shape,
            format!("Running stage '{}' ({}/{})", stage, stage_index + 1, stage_count),
        )
    }

    /// A stage finished and produced a table of the given shape.
    pub fn completed(stage: &str, stage_index: usize, stage_count: usize, shape: (usize, usize)) -> Self {
        Self::new(
            stage,
            stage_index,
            stage_count,
            StageStatus::Completed,
            shape,
            format!(
                "Stage '{}' complete: {} rows x {} columns",
                stage, shape.0, shape.1
            ),
        )
    }

    /// A stage failed; `shape` is that of its input.
    pub fn failed(
        stage: &str,
        stage_index: usize,
        stage_count: usize,
        shape: (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            stage,
            stage_index,
            stage_count,
            StageStatus::Failed,
            shape,
            message.into(),
        )
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

/// Trait for receiving progress updates during a pipeline run.
///
/// Implementations must be `Send + Sync` because a pipeline, reporter
/// included, may be shared between threads.
///
/// # Example
///
/// ```rust,ignore
/// use listing_cleaner::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{}: {}", update.status.display_name(), update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called for every stage event. Keep it cheap; the run waits for it.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_progress_counts_completed_stages() {
        let started = ProgressUpdate::started("drop_columns", 1, 4, (10, 20));
        assert_eq!(started.progress, 0.25);
        assert_eq!(started.status, StageStatus::Started);

        let completed = ProgressUpdate::completed("drop_columns", 1, 4, (10, 2));
        assert_eq!(completed.progress, 0.5);
        assert_eq!(completed.columns, 2);
        assert!(completed.message.contains("drop_columns"));
    }

    #[test]
    fn test_failed_update_keeps_message() {
        let update = ProgressUpdate::failed("prepare_strings", 2, 3, (5, 4), "boom");
        assert_eq!(update.status, StageStatus::Failed);
        assert_eq!(update.message, "boom");
        assert_eq!(update.progress, 2.0 / 3.0);
    }

    #[test]
    fn test_closure_progress_reporter() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let reporter = ClosureProgressReporter::new(move |_update| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::started("a", 0, 1, (1, 1)));
        reporter.report(ProgressUpdate::completed("a", 0, 1, (1, 1)));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_progress_update_json_serialization() {
        let update = ProgressUpdate::completed("drop_price_na", 2, 7, (100, 30));
        let json = serde_json::to_string(&update).unwrap();

        assert!(json.contains("\"stage\":\"drop_price_na\""));
        assert!(json.contains("\"status\":\"completed\""));
        assert!(json.contains("\"rows\":100"));
    }

    #[test]
    fn test_progress_reporter_across_threads() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let reporter: Arc<dyn ProgressReporter> =
            Arc::new(ClosureProgressReporter::new(move |update: ProgressUpdate| {
                seen_clone.lock().unwrap().push(update.stage_index);
            }));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let reporter = reporter.clone();
                std::thread::spawn(move || {
                    reporter.report(ProgressUpdate::started("s", i, 4, (0, 0)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
