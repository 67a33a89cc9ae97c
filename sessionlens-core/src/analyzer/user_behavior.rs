use super::{most_common, tally, FrequencyTable};
use crate::classify::UserActionRecord;
use crate::config::ReportConfig;
use crate::timestamp::parse_time_of_day;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBehaviorReport {
    pub total_actions: usize,
    pub session_duration_seconds: Option<f64>,
    pub most_used_screens: FrequencyTable,
    pub most_common_actions: FrequencyTable,
    pub unique_screens: usize,
    pub actions_per_minute: f64,
}

pub struct UserBehaviorAnalyzer {
    top_screens: usize,
    top_actions: usize,
}

impl UserBehaviorAnalyzer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            top_screens: config.top_screens,
            top_actions: config.top_actions,
        }
    }

    pub fn analyze(&self, actions: &[&UserActionRecord]) -> Option<UserBehaviorReport> {
        if actions.is_empty() {
            return None;
        }

        let screens = tally(actions.iter().map(|a| a.screen.as_str()));
        let most_common_actions = most_common(actions.iter().map(|a| a.action.as_str()), self.top_actions);

        let session_duration_seconds = session_duration(actions);
        let actions_per_minute = match session_duration_seconds {
            Some(seconds) if seconds != 0.0 => actions.len() as f64 * 60.0 / seconds,
            _ => 0.0,
        };

        debug!(
            "User behaviour: {} actions over {} screens, session {:?}s",
            actions.len(),
            screens.len(),
            session_duration_seconds
        );

        Some(UserBehaviorReport {
            total_actions: actions.len(),
            session_duration_seconds,
            unique_screens: screens.len(),
            most_used_screens: screens.into_iter().take(self.top_screens).collect(),
            most_common_actions,
            actions_per_minute,
        })
    }
}

/// Seconds between the first and last timed action, in encounter order.
/// Time-of-day only: a session crossing midnight comes out negative.
fn session_duration(actions: &[&UserActionRecord]) -> Option<f64> {
    let times: Vec<_> = actions
        .iter()
        .filter_map(|action| {
            let time = parse_time_of_day(&action.timestamp);
            if time.is_none() {
                debug!("Line {}: timestamp '{}' is not HH:MM:SS.mmm", action.line_number, action.timestamp);
            }
            time
        })
        .collect();

    if times.len() < 2 {
        return None;
    }

    let start = times[0];
    let end = times[times.len() - 1];
    let elapsed = end.signed_duration_since(start);
    if end < start {
        warn!("Session end {} precedes start {}; log may span midnight", end, start);
    }
    Some(elapsed.num_milliseconds() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(line_number: usize, timestamp: &str, screen: &str, action: &str) -> UserActionRecord {
        UserActionRecord {
            line_number,
            timestamp: timestamp.to_string(),
            screen: screen.to_string(),
            action: action.to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let analyzer = UserBehaviorAnalyzer::new(&ReportConfig::default());
        assert!(analyzer.analyze(&[]).is_none());
    }

    #[test]
    fn test_session_statistics() {
        let records = vec![
            action(1, "10:00:00.000", "Home", "tap_play"),
            action(2, "10:00:05.000", "Home", "tap_pause"),
        ];
        let refs: Vec<_> = records.iter().collect();
        let report = UserBehaviorAnalyzer::new(&ReportConfig::default()).analyze(&refs).unwrap();

        assert_eq!(report.total_actions, 2);
        assert_eq!(report.most_used_screens, vec![("Home".to_string(), 2)]);
        assert_eq!(report.unique_screens, 1);
        assert_eq!(report.session_duration_seconds, Some(5.0));
        assert!((report.actions_per_minute - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_action_has_no_duration() {
        let records = vec![action(1, "10:00:00.000", "Home", "tap_play")];
        let refs: Vec<_> = records.iter().collect();
        let report = UserBehaviorAnalyzer::new(&ReportConfig::default()).analyze(&refs).unwrap();

        assert_eq!(report.session_duration_seconds, None);
        assert_eq!(report.actions_per_minute, 0.0);
    }

    #[test]
    fn test_zero_duration_gives_zero_rate() {
        let records = vec![
            action(1, "10:00:00.000", "Home", "a"),
            action(2, "10:00:00.000", "Home", "b"),
        ];
        let refs: Vec<_> = records.iter().collect();
        let report = UserBehaviorAnalyzer::new(&ReportConfig::default()).analyze(&refs).unwrap();

        assert_eq!(report.session_duration_seconds, Some(0.0));
        assert_eq!(report.actions_per_minute, 0.0);
    }

    #[test]
    fn test_midnight_rollover_is_negative() {
        let records = vec![
            action(1, "23:59:59.000", "Home", "a"),
            action(2, "00:00:01.000", "Home", "b"),
        ];
        let refs: Vec<_> = records.iter().collect();
        let report = UserBehaviorAnalyzer::new(&ReportConfig::default()).analyze(&refs).unwrap();

        assert_eq!(report.session_duration_seconds, Some(-86398.0));
        assert!(report.actions_per_minute < 0.0);
    }

    #[test]
    fn test_unparseable_timestamps_are_skipped() {
        let records = vec![
            action(1, "boot", "Home", "a"),
            action(2, "10:00:00.000", "Home", "b"),
            action(3, "10:01:00.000", "Search", "c"),
            action(4, "later", "Search", "d"),
        ];
        let refs: Vec<_> = records.iter().collect();
        let report = UserBehaviorAnalyzer::new(&ReportConfig::default()).analyze(&refs).unwrap();

        assert_eq!(report.session_duration_seconds, Some(60.0));
        assert!((report.actions_per_minute - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_n_limits() {
        let config = ReportConfig {
            top_screens: 2,
            top_actions: 1,
            ..ReportConfig::default()
        };
        let records = vec![
            action(1, "10:00:00.000", "Home", "tap"),
            action(2, "10:00:01.000", "Search", "type"),
            action(3, "10:00:02.000", "Library", "tap"),
        ];
        let refs: Vec<_> = records.iter().collect();
        let report = UserBehaviorAnalyzer::new(&config).analyze(&refs).unwrap();

        assert_eq!(report.most_used_screens.len(), 2);
        assert_eq!(report.unique_screens, 3);
        assert_eq!(report.most_common_actions, vec![("tap".to_string(), 2)]);
    }
}
