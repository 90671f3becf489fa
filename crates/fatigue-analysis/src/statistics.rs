//! Aggregate and per-type duration statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::FatigueEvent;
use crate::severity::Severity;

/// Integer division rounded half up; zero when `den` is zero
pub fn round_div(num: u64, den: u64) -> u64 {
    if den == 0 {
        return 0;
    }
    ((num as u128 * 2 + den as u128) / (den as u128 * 2)) as u64
}

/// Rounded percentage of `part` in `total`; zero when `total` is zero
pub fn percentage(part: u64, total: u64) -> u64 {
    round_div(part.saturating_mul(100), total)
}

/// Headline statistics over all events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_events: u64,
    pub high_severity_events: u64,
    pub medium_severity_events: u64,
    pub low_severity_events: u64,
    /// Rounded mean duration (seconds)
    pub avg_duration: u64,
    pub max_duration: u64,
    pub min_duration: u64,
    pub total_duration: u64,
}

impl AggregateStats {
    /// Compute statistics in a single pass
    pub fn compute(events: &[FatigueEvent]) -> Self {
        if events.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            min_duration: u64::MAX,
            ..Self::default()
        };

        for event in events {
            stats.total_events += 1;
            stats.total_duration = stats.total_duration.saturating_add(event.duration);
            stats.max_duration = stats.max_duration.max(event.duration);
            stats.min_duration = stats.min_duration.min(event.duration);
            match event.severity() {
                Severity::High => stats.high_severity_events += 1,
                Severity::Medium => stats.medium_severity_events += 1,
                Severity::Low => stats.low_severity_events += 1,
            }
        }

        stats.avg_duration = round_div(stats.total_duration, stats.total_events);
        stats
    }

    /// Event count at a severity level
    pub fn count_for(&self, severity: Severity) -> u64 {
        match severity {
            Severity::High => self.high_severity_events,
            Severity::Medium => self.medium_severity_events,
            Severity::Low => self.low_severity_events,
        }
    }
}

/// Duration statistics for one event type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    pub count: u64,
    pub total_duration: u64,
    pub avg_duration: u64,
    pub max_duration: u64,
}

/// Statistics keyed by event type, ordered by type name
pub type TypeStats = BTreeMap<String, TypeSummary>;

/// Group events by type
pub fn compute_type_stats(events: &[FatigueEvent]) -> TypeStats {
    let mut stats = TypeStats::new();

    for event in events {
        let entry = stats.entry(event.type_name().to_string()).or_default();
        entry.count += 1;
        entry.total_duration = entry.total_duration.saturating_add(event.duration);
        entry.max_duration = entry.max_duration.max(event.duration);
    }

    // Averages are taken once each group is complete
    for summary in stats.values_mut() {
        summary.avg_duration = round_div(summary.total_duration, summary.count);
    }

    stats
}

/// Most frequent type; ties go to the lexicographically smallest name
pub fn dominant_type(stats: &TypeStats) -> Option<(&str, &TypeSummary)> {
    stats.iter().fold(None, |best, (name, summary)| match best {
        Some((_, top)) if summary.count <= top.count => best,
        _ => Some((name.as_str(), summary)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use proptest::prelude::*;

    fn event(duration: u64, kind: &str) -> FatigueEvent {
        let time = NaiveDateTime::parse_from_str("2024-01-15 09:00:00", TIMESTAMP_FORMAT).unwrap();
        FatigueEvent::new(time, duration).with_kind(kind)
    }

    #[test]
    fn test_round_div() {
        assert_eq!(round_div(0, 0), 0);
        assert_eq!(round_div(5, 0), 0);
        assert_eq!(round_div(5, 2), 3);
        assert_eq!(round_div(7, 3), 2);
        assert_eq!(round_div(1, 3), 0);
        assert_eq!(round_div(2, 3), 1);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn test_single_event() {
        let stats = AggregateStats::compute(&[event(35, "eye-closure")]);
        assert_eq!(
            stats,
            AggregateStats {
                total_events: 1,
                high_severity_events: 1,
                medium_severity_events: 0,
                low_severity_events: 0,
                avg_duration: 35,
                max_duration: 35,
                min_duration: 35,
                total_duration: 35,
            }
        );
    }

    #[test]
    fn test_empty_events() {
        let stats = AggregateStats::compute(&[]);
        assert_eq!(stats, AggregateStats::default());
        assert_eq!(stats.min_duration, 0);
        assert!(compute_type_stats(&[]).is_empty());
    }

    #[test]
    fn test_mixed_severity() {
        let events = vec![event(10, "blink"), event(20, "yawn"), event(31, "yawn")];
        let stats = AggregateStats::compute(&events);
        assert_eq!(stats.high_severity_events, 1);
        assert_eq!(stats.medium_severity_events, 1);
        assert_eq!(stats.low_severity_events, 1);
        assert_eq!(stats.min_duration, 10);
        assert_eq!(stats.max_duration, 31);
        // 61 / 3 = 20.33
        assert_eq!(stats.avg_duration, 20);
    }

    #[test]
    fn test_type_stats_recompute_average() {
        let events = vec![event(10, "yawn"), event(11, "yawn"), event(40, "head-nod")];
        let stats = compute_type_stats(&events);
        let yawn = stats["yawn"];
        assert_eq!(yawn.count, 2);
        assert_eq!(yawn.total_duration, 21);
        // 10.5 rounds up
        assert_eq!(yawn.avg_duration, 11);
        assert_eq!(yawn.max_duration, 11);
        assert_eq!(stats["head-nod"].avg_duration, 40);
    }

    #[test]
    fn test_missing_type_grouped_as_unknown() {
        let time = NaiveDateTime::parse_from_str("2024-01-15 09:00:00", TIMESTAMP_FORMAT).unwrap();
        let stats = compute_type_stats(&[FatigueEvent::new(time, 3)]);
        assert!(stats.contains_key(crate::event::UNKNOWN_TYPE));
    }

    #[test]
    fn test_dominant_type_tie_break() {
        let events = vec![
            event(10, "yawn"),
            event(10, "blink"),
            event(10, "yawn"),
            event(10, "blink"),
            event(10, "distraction"),
        ];
        let stats = compute_type_stats(&events);
        let (name, summary) = dominant_type(&stats).unwrap();
        assert_eq!(name, "blink");
        assert_eq!(summary.count, 2);
        assert!(dominant_type(&TypeStats::new()).is_none());
    }

    #[test]
    fn test_duration_totals_saturate() {
        let huge = i64::MAX as u64;
        let events = vec![event(huge, "yawn"), event(huge, "yawn"), event(huge, "yawn")];

        let stats = AggregateStats::compute(&events);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_duration, u64::MAX);
        assert_eq!(stats.max_duration, huge);
        assert_eq!(stats.high_severity_events, 3);

        let by_type = compute_type_stats(&events);
        assert_eq!(by_type["yawn"].total_duration, u64::MAX);
        assert_eq!(by_type["yawn"].count, 3);
    }

    proptest! {
        #[test]
        fn severity_counts_add_up(durations in proptest::collection::vec(0u64..120, 0..60)) {
            let events: Vec<_> = durations.iter().map(|&d| event(d, "yawn")).collect();
            let stats = AggregateStats::compute(&events);
            prop_assert_eq!(stats.total_events, events.len() as u64);
            prop_assert_eq!(
                stats.high_severity_events + stats.medium_severity_events + stats.low_severity_events,
                stats.total_events
            );
            prop_assert_eq!(stats.total_duration, durations.iter().sum::<u64>());
        }
    }
}
