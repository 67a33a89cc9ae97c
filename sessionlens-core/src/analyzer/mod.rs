pub mod errors;
pub mod performance;
pub mod user_behavior;

use crate::config::ReportConfig;
use crate::parser::ParsedLog;
use std::collections::HashMap;
use tracing::debug;

pub use errors::{ErrorAnalyzer, ErrorBucket, ErrorReport};
pub use performance::{PerformanceAnalyzer, PerformanceReport};
pub use user_behavior::{UserBehaviorAnalyzer, UserBehaviorReport};

/// `(value, count)` pairs, most frequent first.
pub type FrequencyTable = Vec<(String, usize)>;

/// Counts each distinct value and orders by count, descending. Values with
/// equal counts keep the order in which they were first seen.
pub fn tally<'a, I>(values: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table: FrequencyTable = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for value in values {
        match positions.get(value) {
            Some(&index) => table[index].1 += 1,
            None => {
                positions.insert(value, table.len());
                table.push((value.to_string(), 1));
            }
        }
    }

    table.sort_by(|a, b| b.1.cmp(&a.1));
    table
}

pub fn most_common<'a, I>(values: I, n: usize) -> FrequencyTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = tally(values);
    table.truncate(n);
    table
}

/// Results of the three aggregators over one parsed log.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub user_behavior: Option<UserBehaviorReport>,
    pub performance: Option<PerformanceReport>,
    pub errors: ErrorReport,
}

pub struct Analyzer {
    config: ReportConfig,
}

impl Analyzer {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, parsed: &ParsedLog) -> Analysis {
        debug!("Running aggregators over {} events", parsed.events().len());

        let user_actions: Vec<_> = parsed.user_actions().collect();
        let performance: Vec<_> = parsed.performance_records().collect();
        let errors: Vec<_> = parsed.errors().collect();

        Analysis {
            user_behavior: UserBehaviorAnalyzer::new(&self.config).analyze(&user_actions),
            performance: PerformanceAnalyzer::new(&self.config).analyze(&performance),
            errors: ErrorAnalyzer::new().analyze(&errors),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}
