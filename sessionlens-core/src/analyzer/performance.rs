use super::{most_common, FrequencyTable};
use crate::classify::PerformanceRecord;
use crate::config::ReportConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Status token written for operations that completed normally.
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// Length cap of `slowest_operations`.
pub const SLOWEST_OPERATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_operations: usize,
    pub average_duration_ms: f64,
    pub max_duration_ms: u64,
    pub min_duration_ms: u64,
    pub failed_operations: usize,
    pub success_rate: f64,
    pub slowest_operations: Vec<PerformanceRecord>,
    pub operation_frequency: FrequencyTable,
}

pub struct PerformanceAnalyzer {
    top_operations: usize,
}

impl PerformanceAnalyzer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            top_operations: config.top_operations,
        }
    }

    pub fn analyze(&self, records: &[&PerformanceRecord]) -> Option<PerformanceReport> {
        let total = records.len();
        if total == 0 {
            return None;
        }

        let durations = records.iter().map(|r| r.duration_ms);
        let sum: u128 = durations.clone().map(u128::from).sum();
        let max_duration_ms = durations.clone().max().unwrap_or_default();
        let min_duration_ms = durations.min().unwrap_or_default();

        let failed_operations = records.iter().filter(|r| r.status != SUCCESS_STATUS).count();
        let success_rate = (total - failed_operations) as f64 / total as f64 * 100.0;

        // sort_by is stable, so equal durations stay in encounter order
        let mut slowest: Vec<&PerformanceRecord> = records.to_vec();
        slowest.sort_by(|a, b| b.duration_ms.cmp(&a.duration_ms));
        slowest.truncate(SLOWEST_OPERATIONS);

        debug!(
            "Performance: {} operations, {} failed, max {}ms",
            total, failed_operations, max_duration_ms
        );

        Some(PerformanceReport {
            total_operations: total,
            average_duration_ms: sum as f64 / total as f64,
            max_duration_ms,
            min_duration_ms,
            failed_operations,
            success_rate,
            slowest_operations: slowest.into_iter().cloned().collect(),
            operation_frequency: most_common(records.iter().map(|r| r.operation.as_str()), self.top_operations),
        })
    }
}
