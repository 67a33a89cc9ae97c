use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

// Compile regexes once at startup for performance
static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}:\d{2}:\d{2}\.\d{3})\]").expect("Failed to compile timestamp regex")
});

/// Format written by the instrumentation logger (`HH:mm:ss.SSS`).
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S%.3f";

/// Returns the first bracketed `HH:MM:SS.mmm` value in the line, without brackets.
pub fn extract_timestamp(line: &str) -> Option<String> {
    TIMESTAMP_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn parse_time_of_day(timestamp: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(timestamp.trim(), TIME_OF_DAY_FORMAT).ok()
}
