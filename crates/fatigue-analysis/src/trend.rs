//! Per-day rollup and recent trend

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::FatigueEvent;
use crate::policy::DailyRiskWeights;
use crate::severity::Severity;
use crate::statistics::round_div;

/// Risk label for a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DailyRiskLevel {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
}

impl DailyRiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DailyRiskLevel::High => "High",
            DailyRiskLevel::Medium => "Medium",
            DailyRiskLevel::Low => "Low",
        }
    }
}

/// Events on one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub count: u64,
    /// Sum of durations (seconds)
    pub duration: u64,
    pub high_severity_count: u64,
    pub avg_duration: u64,
}

impl DailySummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            duration: 0,
            high_severity_count: 0,
            avg_duration: 0,
        }
    }

    /// Weighted score used for the daily risk label
    pub fn risk_score(&self, weights: &DailyRiskWeights) -> u64 {
        let others = self.count.saturating_sub(self.high_severity_count);
        let bonus = if self.avg_duration > weights.long_average_above {
            weights.long_average_bonus as u64
        } else {
            0
        };
        self.high_severity_count
            .saturating_mul(weights.high_weight as u64)
            .saturating_add(others.saturating_mul(weights.other_weight as u64))
            .saturating_add(bonus)
    }

    /// Risk label for this day
    pub fn risk_level(&self, weights: &DailyRiskWeights) -> DailyRiskLevel {
        let score = self.risk_score(weights);
        if score >= weights.high_floor as u64 {
            DailyRiskLevel::High
        } else if score >= weights.medium_floor as u64 {
            DailyRiskLevel::Medium
        } else {
            DailyRiskLevel::Low
        }
    }
}

/// Day summaries keyed by date, ascending
pub type DailyStats = BTreeMap<NaiveDate, DailySummary>;

/// One point of the recent trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[serde(flatten)]
    pub day: DailySummary,
    pub risk_level: DailyRiskLevel,
}

/// Group events by calendar date
pub fn compute_daily_stats(events: &[FatigueEvent]) -> DailyStats {
    let mut daily = DailyStats::new();

    for event in events {
        let date = event.date();
        let entry = daily.entry(date).or_insert_with(|| DailySummary::empty(date));
        entry.count += 1;
        entry.duration = entry.duration.saturating_add(event.duration);
        if event.severity() == Severity::High {
            entry.high_severity_count += 1;
        }
    }

    for day in daily.values_mut() {
        day.avg_duration = round_div(day.duration, day.count);
    }

    daily
}

/// The `window` most recent dates present in `daily`, oldest first
///
/// This is the latest dates that have events, not the last calendar days
/// before today.
pub fn select_trend(daily: &DailyStats, window: usize, weights: &DailyRiskWeights) -> Vec<TrendPoint> {
    let mut recent: Vec<TrendPoint> = daily
        .values()
        .rev()
        .take(window)
        .map(|day| TrendPoint {
            day: *day,
            risk_level: day.risk_level(weights),
        })
        .collect();
    recent.reverse();
    recent
}

/// Daily rollup followed by trend selection
pub fn compute_daily_trend(
    events: &[FatigueEvent],
    window: usize,
    weights: &DailyRiskWeights,
) -> Vec<TrendPoint> {
    select_trend(&compute_daily_stats(events), window, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;

    fn event(ts: &str, duration: u64) -> FatigueEvent {
        FatigueEvent::new(NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(), duration)
    }

    fn day(count: u64, high: u64, avg: u64) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            count,
            duration: avg.saturating_mul(count),
            high_severity_count: high,
            avg_duration: avg,
        }
    }

    #[test]
    fn test_daily_grouping() {
        let events = vec![
            event("2024-01-15 09:00:00", 35),
            event("2024-01-15 21:00:00", 10),
            event("2024-01-16 08:00:00", 20),
        ];
        let daily = compute_daily_stats(&events);
        assert_eq!(daily.len(), 2);

        let first = daily[&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()];
        assert_eq!(first.count, 2);
        assert_eq!(first.duration, 45);
        assert_eq!(first.high_severity_count, 1);
        // 22.5 rounds up
        assert_eq!(first.avg_duration, 23);
    }

    #[test]
    fn test_trend_keeps_latest_seven_dates() {
        let mut events = Vec::new();
        for d in 1..=10 {
            events.push(event(&format!("2024-03-{:02} 10:00:00", d), 5));
        }
        // Unordered input
        events.reverse();
        events.swap(2, 7);

        let trend = compute_daily_trend(&events, 7, &DailyRiskWeights::default());
        assert_eq!(trend.len(), 7);
        let dates: Vec<u32> = trend.iter().map(|p| chrono::Datelike::day(&p.day.date)).collect();
        assert_eq!(dates, vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_trend_with_few_dates_and_gaps() {
        let events = vec![
            event("2023-12-31 10:00:00", 5),
            event("2024-02-10 10:00:00", 5),
            event("2024-01-05 10:00:00", 5),
        ];
        let trend = compute_daily_trend(&events, 7, &DailyRiskWeights::default());
        assert_eq!(trend.len(), 3);
        assert!(trend.windows(2).all(|w| w[0].day.date < w[1].day.date));
        assert!(compute_daily_trend(&[], 7, &DailyRiskWeights::default()).is_empty());
    }

    #[test]
    fn test_daily_risk_levels() {
        let w = DailyRiskWeights::default();
        // 3*2 + 1*2 = 8
        assert_eq!(day(4, 2, 20).risk_level(&w), DailyRiskLevel::Medium);
        // 3*2 + 1*2 + 2 = 10
        assert_eq!(day(4, 2, 26).risk_level(&w), DailyRiskLevel::High);
        // 1*4 = 4
        assert_eq!(day(4, 0, 10).risk_level(&w), DailyRiskLevel::Low);
        // 1*5 = 5
        assert_eq!(day(5, 0, 10).risk_level(&w), DailyRiskLevel::Medium);
        // avg exactly 25 gets no bonus: 3*1 = 3
        assert_eq!(day(1, 1, 25).risk_score(&w), 3);
    }

    #[test]
    fn test_inconsistent_day_does_not_underflow() {
        let w = DailyRiskWeights::default();
        // More high-severity events than events in total
        assert_eq!(day(1, 3, 10).risk_score(&w), 9);
        assert_eq!(day(u64::MAX, u64::MAX, 10).risk_score(&w), u64::MAX);
        assert_eq!(day(u64::MAX, 0, 10).risk_level(&w), DailyRiskLevel::High);
    }

    #[test]
    fn test_daily_duration_saturates() {
        let huge = i64::MAX as u64;
        let events = vec![
            event("2024-01-15 09:00:00", huge),
            event("2024-01-15 10:00:00", huge),
            event("2024-01-15 11:00:00", huge),
        ];
        let daily = compute_daily_stats(&events);
        let only = daily[&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()];
        assert_eq!(only.count, 3);
        assert_eq!(only.duration, u64::MAX);
        assert_eq!(only.high_severity_count, 3);
    }
}
