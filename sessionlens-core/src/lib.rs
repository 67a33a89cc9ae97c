// SessionLens Library - testing-session log analysis
//
// Classifies the lines written by the app's testing logger, aggregates
// user-behaviour, performance and error statistics, and renders the
// JSON and console reports used by the CLI.

pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod parser;
pub mod timestamp;

pub use analyzer::{Analysis, Analyzer, ErrorBucket, ErrorReport, PerformanceReport, UserBehaviorReport};
pub use classify::{classify_line, Category, Classification, EventRecord, LogEvent, PerformanceRecord, UserActionRecord};
pub use config::{Config, ReportConfig};
pub use error::{AnalyzerError, Result};
pub use output::{build_report, save_report, write_report_to, write_sibling_report, AnalysisReport, ConsoleOutput, JsonOutput, OutputGenerator};
pub use parser::{LogLine, ParsedLog};
pub use timestamp::extract_timestamp;

use chrono::Local;
use std::path::Path;
use tracing::info;

/// Parses and aggregates a log file in one call, stamping the report with the
/// current local time.
pub fn analyze_file(path: impl AsRef<Path>, config: &Config) -> Result<AnalysisReport> {
    let path = path.as_ref();
    let parsed = ParsedLog::parse_file(path)?;
    let analysis = Analyzer::new(config.report.clone()).analyze(&parsed);
    info!("Analysis of {} complete", path.display());
    Ok(build_report(&parsed, analysis, Local::now().naive_local()))
}
