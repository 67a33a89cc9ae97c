use crate::timestamp::extract_timestamp;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// [timestamp] Screen: Action | metadata
static USER_ACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\s+(?:UserAction:\s*)?([^:]+):\s+([^|]+?)(?:\s*\|\s*(.+))?$")
        .expect("Failed to compile user action regex")
});

// [timestamp] Operation: 123ms [STATUS] | metadata
static PERFORMANCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\s+(?:Performance:\s*)?([^:]+):\s+(\d+)ms\s+\[([^\]]+)\](?:\s*\|\s*(.+))?")
        .expect("Failed to compile performance regex")
});

const ERROR_KEYWORDS: [&str; 4] = ["error", "exception", "crash", "fatal"];

/// Event categories in the order they are tried against a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    UserAction,
    Performance,
    Network,
    Audio,
    Ui,
    Error,
}

impl Category {
    pub const CASCADE: [Category; 6] = [
        Category::UserAction,
        Category::Performance,
        Category::Network,
        Category::Audio,
        Category::Ui,
        Category::Error,
    ];

    /// First category whose marker appears in the line.
    pub fn detect(line: &str) -> Option<Category> {
        Self::CASCADE.into_iter().find(|category| category.marker_matches(line))
    }

    pub fn marker_matches(&self, line: &str) -> bool {
        match self {
            Category::UserAction => line.contains("UserAction"),
            Category::Performance => line.contains("Performance"),
            Category::Network => line.contains("Network"),
            Category::Audio => line.contains("Audio"),
            Category::Ui => line.contains("UI"),
            Category::Error => {
                let lower = line.to_lowercase();
                ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::UserAction => "user_action",
            Category::Performance => "performance",
            Category::Network => "network",
            Category::Audio => "audio",
            Category::Ui => "ui",
            Category::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActionRecord {
    #[serde(rename = "line_num")]
    pub line_number: usize,
    pub timestamp: String,
    pub screen: String,
    pub action: String,
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(rename = "line_num")]
    pub line_number: usize,
    pub timestamp: String,
    pub operation: String,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    pub status: String,
    pub metadata: Option<String>,
}

/// Verbatim line kept for the network, audio, UI and error categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "line_num")]
    pub line_number: usize,
    #[serde(rename = "content")]
    pub raw_text: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    UserAction(UserActionRecord),
    Performance(PerformanceRecord),
    Network(EventRecord),
    Audio(EventRecord),
    Ui(EventRecord),
    Error(EventRecord),
}

impl LogEvent {
    pub fn category(&self) -> Category {
        match self {
            LogEvent::UserAction(_) => Category::UserAction,
            LogEvent::Performance(_) => Category::Performance,
            LogEvent::Network(_) => Category::Network,
            LogEvent::Audio(_) => Category::Audio,
            LogEvent::Ui(_) => Category::Ui,
            LogEvent::Error(_) => Category::Error,
        }
    }

    pub fn line_number(&self) -> usize {
        match self {
            LogEvent::UserAction(record) => record.line_number,
            LogEvent::Performance(record) => record.line_number,
            LogEvent::Network(record)
            | LogEvent::Audio(record)
            | LogEvent::Ui(record)
            | LogEvent::Error(record) => record.line_number,
        }
    }
}

/// Outcome of running one line through the classifier cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Event(LogEvent),
    /// The marker matched but the structural pattern did not.
    Rejected(Category),
    Unclassified,
}

pub fn classify_line(line_number: usize, line: &str) -> Classification {
    match Category::detect(line) {
        Some(category) => match extract(category, line_number, line) {
            Some(event) => Classification::Event(event),
            None => Classification::Rejected(category),
        },
        None => Classification::Unclassified,
    }
}

/// Applies the category's structural pattern to a line already routed to it.
pub fn extract(category: Category, line_number: usize, line: &str) -> Option<LogEvent> {
    match category {
        Category::UserAction => parse_user_action(line_number, line).map(LogEvent::UserAction),
        Category::Performance => parse_performance(line_number, line).map(LogEvent::Performance),
        Category::Network => Some(LogEvent::Network(verbatim(line_number, line))),
        Category::Audio => Some(LogEvent::Audio(verbatim(line_number, line))),
        Category::Ui => Some(LogEvent::Ui(verbatim(line_number, line))),
        Category::Error => Some(LogEvent::Error(verbatim(line_number, line))),
    }
}

pub fn parse_user_action(line_number: usize, line: &str) -> Option<UserActionRecord> {
    let caps = USER_ACTION_REGEX.captures(line)?;

    Some(UserActionRecord {
        line_number,
        timestamp: caps[1].to_string(),
        screen: caps[2].trim().to_string(),
        action: caps[3].trim().to_string(),
        metadata: caps.get(4).map(|m| m.as_str().trim().to_string()),
    })
}

pub fn parse_performance(line_number: usize, line: &str) -> Option<PerformanceRecord> {
    let caps = PERFORMANCE_REGEX.captures(line)?;
    let duration_ms = caps[3].parse::<u64>().ok()?;

    Some(PerformanceRecord {
        line_number,
        timestamp: caps[1].to_string(),
        operation: caps[2].trim().to_string(),
        duration_ms,
        status: caps[4].trim().to_string(),
        metadata: caps.get(5).map(|m| m.as_str().trim().to_string()),
    })
}

fn verbatim(line_number: usize, line: &str) -> EventRecord {
    EventRecord {
        line_number,
        raw_text: line.to_string(),
        timestamp: extract_timestamp(line),
    }
}
