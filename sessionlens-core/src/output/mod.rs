pub mod console;
pub mod json;

use crate::analyzer::{Analysis, ErrorReport, PerformanceReport, UserBehaviorReport};
use crate::classify::Category;
use crate::error::{AnalyzerError, Result};
use crate::parser::ParsedLog;
use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use console::ConsoleOutput;
pub use json::JsonOutput;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub log_file: String,
    pub total_log_lines: usize,
    pub analysis_timestamp: String,
    #[serde(serialize_with = "empty_object_if_none")]
    pub user_behavior: Option<UserBehaviorReport>,
    #[serde(serialize_with = "empty_object_if_none")]
    pub performance: Option<PerformanceReport>,
    pub errors: ErrorReport,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_user_actions: usize,
    pub total_performance_metrics: usize,
    pub total_network_requests: usize,
    pub total_audio_events: usize,
    pub total_ui_events: usize,
    pub total_errors: usize,
}

impl ReportSummary {
    pub fn from_parsed(parsed: &ParsedLog) -> Self {
        Self {
            total_user_actions: parsed.count(Category::UserAction),
            total_performance_metrics: parsed.count(Category::Performance),
            total_network_requests: parsed.count(Category::Network),
            total_audio_events: parsed.count(Category::Audio),
            total_ui_events: parsed.count(Category::Ui),
            total_errors: parsed.count(Category::Error),
        }
    }
}

/// Absent sections are written as `{}` rather than `null`.
fn empty_object_if_none<T, S>(value: &Option<T>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

pub trait OutputGenerator {
    fn generate(&self, report: &AnalysisReport) -> Result<String>;
    fn file_extension(&self) -> &str;
}

pub fn build_report(parsed: &ParsedLog, analysis: Analysis, generated_at: NaiveDateTime) -> AnalysisReport {
    AnalysisReport {
        log_file: parsed.source().display().to_string(),
        total_log_lines: parsed.total_lines(),
        analysis_timestamp: generated_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        user_behavior: analysis.user_behavior,
        performance: analysis.performance,
        errors: analysis.errors,
        summary: ReportSummary::from_parsed(parsed),
    }
}

/// Sibling path for the structured report: the log path with its extension replaced.
pub fn report_path_for(log_file: &Path, extension: &str) -> Result<PathBuf> {
    let report_path = log_file.with_extension(extension);
    if report_path == log_file {
        return Err(AnalyzerError::OutputCollision(report_path));
    }
    Ok(report_path)
}

pub fn save_report(content: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| AnalyzerError::io(parent, e))?;
        }
    }
    fs::write(output_path, content).map_err(|e| AnalyzerError::io(output_path, e))?;
    info!("Saved report to {}", output_path.display());
    Ok(())
}

/// Renders the report with `generator` and writes it next to the log file.
pub fn write_sibling_report(
    report: &AnalysisReport,
    log_file: &Path,
    generator: &dyn OutputGenerator,
) -> Result<PathBuf> {
    let output_path = report_path_for(log_file, generator.file_extension())?;
    write_report_to(report, log_file, &output_path, generator)?;
    Ok(output_path)
}

/// Renders the report with `generator` into an explicit path, which must not be the log itself.
pub fn write_report_to(
    report: &AnalysisReport,
    log_file: &Path,
    output_path: &Path,
    generator: &dyn OutputGenerator,
) -> Result<()> {
    if output_path == log_file {
        return Err(AnalyzerError::OutputCollision(output_path.to_path_buf()));
    }
    debug!("Writing {} report to {}", generator.file_extension(), output_path.display());
    let content = generator.generate(report)?;
    save_report(&content, output_path)
}
