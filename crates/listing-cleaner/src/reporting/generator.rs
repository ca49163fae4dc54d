use crate::error::Result;
use crate::types::CleaningSummary;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Run Report
// ============================================================================

/// JSON report of one cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Local time the report was built, RFC 3339
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned output file (if written)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Stage names in execution order
    pub stages: Vec<String>,
    pub summary: CleaningSummary,
}

impl CleaningReport {
    pub fn new(
        input_file: impl AsRef<Path>,
        output_file: Option<&Path>,
        summary: CleaningSummary,
    ) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            input_file: input_file.as_ref().display().to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            stages: summary.stages.iter().map(|s| s.name.clone()).collect(),
            summary,
        }
    }
}

/// Writes run reports into a directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write a report to a JSON file.
    ///
    /// If `report_base_name` is "Kangaroo", the file will be
    /// "Kangaroo_report.json". The output directory is created if needed.
    pub fn write_report(&self, report: &CleaningReport, report_base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StageSummary;

    fn summary() -> CleaningSummary {
        CleaningSummary {
            rows_before: 5,
            rows_after: 3,
            columns_before: 4,
            columns_after: 4,
            stages: vec![StageSummary {
                name: "drop_price_na".to_string(),
                kind: "row_filter_on_missing".to_string(),
                rows_before: 5,
                rows_after: 3,
                columns_before: 4,
                columns_after: 4,
                duration_ms: 0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_report_lists_stages() {
        let report = CleaningReport::new("data/Kangaroo.csv", None, summary());

        assert_eq!(report.stages, vec!["drop_price_na".to_string()]);
        assert_eq!(report.input_file, "data/Kangaroo.csv");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_write_report_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("reports"));
        let report = CleaningReport::new(
            "Kangaroo.csv",
            Some(Path::new("cleaned.csv")),
            summary(),
        );

        let path = generator.write_report(&report, "Kangaroo").unwrap();

        assert_eq!(path.file_name().unwrap(), "Kangaroo_report.json");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["output_file"], "cleaned.csv");
        assert_eq!(written["summary"]["rows_after"], 3);
    }
}
