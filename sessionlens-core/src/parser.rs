use crate::classify::{classify_line, Category, Classification, EventRecord, LogEvent, PerformanceRecord, UserActionRecord};
use crate::error::{AnalyzerError, Result};
use crate::input::read_log_source;
use crate::timestamp::extract_timestamp;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    #[serde(rename = "line_num")]
    pub line_number: usize,
    #[serde(rename = "content")]
    pub raw_text: String,
    pub timestamp: Option<String>,
}

/// Everything collected in the single pass over a log source.
///
/// Owns the raw lines and an append-only event log; aggregators borrow it
/// read-only and filter the events by category.
#[derive(Debug, Clone)]
pub struct ParsedLog {
    source: PathBuf,
    lines: Vec<LogLine>,
    events: Vec<LogEvent>,
    rejected: usize,
}

impl ParsedLog {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalyzerError::SourceNotFound(path.to_path_buf()));
        }

        let text = read_log_source(path)?;
        Ok(Self::parse_str(path, &text))
    }

    pub fn parse_str(source: impl Into<PathBuf>, text: &str) -> Self {
        let mut parsed = ParsedLog {
            source: source.into(),
            lines: Vec::new(),
            events: Vec::new(),
            rejected: 0,
        };

        for (index, physical) in physical_lines(text).enumerate() {
            let line = physical.trim();
            if line.is_empty() {
                continue;
            }
            parsed.push_line(index + 1, line);
        }

        info!(
            "Parsed {} lines from {}: {} classified events, {} rejected by pattern",
            parsed.lines.len(),
            parsed.source.display(),
            parsed.events.len(),
            parsed.rejected
        );
        parsed
    }

    fn push_line(&mut self, line_number: usize, line: &str) {
        match classify_line(line_number, line) {
            Classification::Event(event) => self.events.push(event),
            Classification::Rejected(category) => {
                debug!("Line {} carries the {} marker but does not match its pattern", line_number, category);
                self.rejected += 1;
            }
            Classification::Unclassified => {}
        }

        self.lines.push(LogLine {
            line_number,
            raw_text: line.to_string(),
            timestamp: extract_timestamp(line),
        });
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Lines that carried a category marker but failed its structural pattern.
    pub fn rejected_lines(&self) -> usize {
        self.rejected
    }

    pub fn count(&self, category: Category) -> usize {
        self.events.iter().filter(|event| event.category() == category).count()
    }

    pub fn user_actions(&self) -> impl Iterator<Item = &UserActionRecord> + '_ {
        self.events.iter().filter_map(|event| match event {
            LogEvent::UserAction(record) => Some(record),
            _ => None,
        })
    }

    pub fn performance_records(&self) -> impl Iterator<Item = &PerformanceRecord> + '_ {
        self.events.iter().filter_map(|event| match event {
            LogEvent::Performance(record) => Some(record),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &EventRecord> + '_ {
        self.events.iter().filter_map(|event| match event {
            LogEvent::Error(record) => Some(record),
            _ => None,
        })
    }
}

/// Splits on `\r\n`, `\r` and `\n` so line numbers match what an editor shows.
fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                (!current.is_empty()).then_some(current)
            }
        }
    })
}
