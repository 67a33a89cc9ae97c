use super::{AnalysisReport, OutputGenerator};
use crate::config::ReportConfig;
use crate::error::Result;
use std::fmt::Write;

const RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 30;

/// Human-readable report printed after the JSON file is written.
pub struct ConsoleOutput {
    recent_errors: usize,
    preview_chars: usize,
}

impl ConsoleOutput {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            recent_errors: config.recent_errors_shown,
            preview_chars: config.error_preview_chars,
        }
    }

    fn write_header(&self, out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
        writeln!(out, "🧪 SESSIONLENS - LOG ANALYSIS REPORT")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "📁 Log File: {}", report.log_file)?;
        writeln!(out, "📊 Total Log Lines: {}", report.total_log_lines)?;
        writeln!(out, "⏰ Analysis Time: {}", report.analysis_timestamp)?;
        writeln!(out)
    }

    fn write_user_behavior(&self, out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
        let Some(behavior) = &report.user_behavior else {
            return Ok(());
        };

        section_title(out, "👤 USER BEHAVIOR ANALYSIS")?;
        writeln!(out, "Total Actions: {}", behavior.total_actions)?;
        if let Some(seconds) = behavior.session_duration_seconds.filter(|s| *s != 0.0) {
            writeln!(out, "Session Duration: {:.1} seconds", seconds)?;
            writeln!(out, "Actions per Minute: {:.1}", behavior.actions_per_minute)?;
        }
        writeln!(out, "Unique Screens Visited: {}", behavior.unique_screens)?;

        writeln!(out, "\n📱 Most Used Screens:")?;
        for (screen, count) in &behavior.most_used_screens {
            writeln!(out, "  • {}: {} actions", screen, count)?;
        }

        writeln!(out, "\n🎯 Most Common Actions:")?;
        for (action, count) in &behavior.most_common_actions {
            writeln!(out, "  • {}: {} times", action, count)?;
        }
        writeln!(out)
    }

    fn write_performance(&self, out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
        let Some(performance) = &report.performance else {
            return Ok(());
        };

        section_title(out, "⚡ PERFORMANCE ANALYSIS")?;
        writeln!(out, "Total Operations: {}", performance.total_operations)?;
        writeln!(out, "Average Duration: {:.1}ms", performance.average_duration_ms)?;
        writeln!(out, "Success Rate: {:.1}%", performance.success_rate)?;
        writeln!(out, "Failed Operations: {}", performance.failed_operations)?;

        writeln!(out, "\n🐌 Slowest Operations:")?;
        for op in &performance.slowest_operations {
            writeln!(out, "  • {}: {}ms [{}]", op.operation, op.duration_ms, op.status)?;
        }
        writeln!(out)
    }

    fn write_errors(&self, out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
        let errors = &report.errors;
        if errors.total_errors == 0 {
            writeln!(out, "✅ NO ERRORS DETECTED")?;
            return writeln!(out);
        }

        section_title(out, "🚨 ERROR ANALYSIS")?;
        writeln!(out, "Total Errors: {}", errors.total_errors)?;

        if let Some(types) = &errors.error_types {
            writeln!(out, "\nError Types:")?;
            for (bucket, count) in types {
                writeln!(out, "  • {}: {}", bucket.label(), count)?;
            }
        }

        writeln!(out, "\n📋 Recent Errors:")?;
        for error in errors.error_details.iter().flatten().take(self.recent_errors) {
            let preview: String = error.raw_text.chars().take(self.preview_chars).collect();
            writeln!(out, "  Line {}: {}...", error.line_number, preview)?;
        }
        writeln!(out)
    }

    fn write_summary(&self, out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
        let summary = &report.summary;
        section_title(out, "📈 SUMMARY")?;
        writeln!(out, "User Actions: {}", summary.total_user_actions)?;
        writeln!(out, "Performance Metrics: {}", summary.total_performance_metrics)?;
        writeln!(out, "Network Requests: {}", summary.total_network_requests)?;
        writeln!(out, "Audio Events: {}", summary.total_audio_events)?;
        writeln!(out, "UI Events: {}", summary.total_ui_events)?;
        writeln!(out, "Errors: {}", summary.total_errors)
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl OutputGenerator for ConsoleOutput {
    fn generate(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();
        self.write_header(&mut out, report)?;
        self.write_user_behavior(&mut out, report)?;
        self.write_performance(&mut out, report)?;
        self.write_errors(&mut out, report)?;
        self.write_summary(&mut out, report)?;
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

fn section_title(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(SECTION_RULE_WIDTH))
}
