//! Fatigue Analysis Engine
//!
//! Turns a driver's raw fatigue events into report-ready figures:
//! - Per-event severity
//! - Aggregate and per-type duration statistics
//! - Daily rollup and recent trend with per-day risk
//! - Heuristic overall risk assessment
//! - Time-of-day distribution
//! - Fleet-wide rollup across drivers
//!
//! Everything here is pure and synchronous. The same events always produce
//! the same analysis, and separate calls share no state.

pub mod event;
pub mod fleet;
pub mod policy;
pub mod risk;
pub mod severity;
pub mod statistics;
pub mod time_distribution;
pub mod trend;

pub use event::{FatigueEvent, UserIdentity, TIMESTAMP_FORMAT, UNKNOWN_LOCATION, UNKNOWN_TYPE};
pub use fleet::{
    analyze_fleet, AssessedUser, CountBuckets, DurationBuckets, FleetAnalysis, FleetOverview,
    FleetRiskLevel, FleetUserSummary, RiskDistribution,
};
pub use policy::{PolicyError, RiskPolicy};
pub use risk::{RiskAssessment, RiskTier};
pub use severity::{classify_severity, Severity};
pub use statistics::{percentage, round_div, AggregateStats, TypeStats, TypeSummary};
pub use time_distribution::{TimeBand, TimeDistribution};
pub use trend::{DailyRiskLevel, DailyStats, DailySummary, TrendPoint};

use serde::Serialize;
use tracing::debug;

/// All figures derived from one driver's events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueAnalysis {
    pub stats: AggregateStats,
    pub type_stats: TypeStats,
    pub daily_stats: DailyStats,
    pub trend: Vec<TrendPoint>,
    pub risk: RiskAssessment,
    pub time_distribution: TimeDistribution,
}

/// Fatigue analysis engine
#[derive(Debug, Clone, Default)]
pub struct FatigueAnalysisEngine {
    policy: RiskPolicy,
}

impl FatigueAnalysisEngine {
    /// Create an engine with a validated policy
    pub fn new(policy: RiskPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Severity of a single event duration
    pub fn classify_severity(&self, duration_secs: u64) -> Severity {
        Severity::classify(duration_secs)
    }

    pub fn aggregate_stats(&self, events: &[FatigueEvent]) -> AggregateStats {
        AggregateStats::compute(events)
    }

    pub fn type_stats(&self, events: &[FatigueEvent]) -> TypeStats {
        statistics::compute_type_stats(events)
    }

    /// Most recent dates present, oldest first
    pub fn daily_trend(&self, events: &[FatigueEvent]) -> Vec<TrendPoint> {
        trend::compute_daily_trend(events, self.policy.trend_window_days, &self.policy.daily)
    }

    pub fn daily_risk_level(&self, day: &DailySummary) -> DailyRiskLevel {
        day.risk_level(&self.policy.daily)
    }

    pub fn assess_risk(
        &self,
        stats: &AggregateStats,
        type_stats: &TypeStats,
        trend: &[TrendPoint],
    ) -> RiskAssessment {
        risk::assess_risk(stats, type_stats, trend, &self.policy)
    }

    pub fn time_distribution(&self, events: &[FatigueEvent]) -> TimeDistribution {
        time_distribution::analyze_time_distribution(events)
    }

    /// Run the full chain over one driver's events
    pub fn analyze(&self, events: &[FatigueEvent]) -> FatigueAnalysis {
        if events.is_empty() {
            debug!("No fatigue events supplied, producing zero-valued analysis");
        }

        let stats = self.aggregate_stats(events);
        let type_stats = self.type_stats(events);
        let daily_stats = trend::compute_daily_stats(events);
        let trend = trend::select_trend(&daily_stats, self.policy.trend_window_days, &self.policy.daily);
        let risk = self.assess_risk(&stats, &type_stats, &trend);
        let time_distribution = self.time_distribution(events);

        debug!(
            "Analyzed {} events: score={} level={} trend_days={}",
            stats.total_events,
            risk.score,
            risk.risk_level,
            trend.len()
        );

        FatigueAnalysis {
            stats,
            type_stats,
            daily_stats,
            trend,
            risk,
            time_distribution,
        }
    }

    /// Roll up per-driver totals across the fleet
    pub fn analyze_fleet(&self, users: &[FleetUserSummary]) -> FleetAnalysis {
        debug!("Analyzing fleet of {} drivers", users.len());
        fleet::analyze_fleet(users, &self.policy.fleet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn event(ts: &str, duration: u64, kind: &str) -> FatigueEvent {
        FatigueEvent::new(NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(), duration)
            .with_kind(kind)
    }

    #[test]
    fn test_empty_analysis() {
        let engine = FatigueAnalysisEngine::default();
        let analysis = engine.analyze(&[]);
        assert_eq!(analysis.stats, AggregateStats::default());
        assert!(analysis.trend.is_empty());
        assert_eq!(analysis.risk.risk_level, 1);
        assert_eq!(analysis.time_distribution, TimeDistribution::default());
    }

    #[test]
    fn test_thirty_events_same_day() {
        let engine = FatigueAnalysisEngine::default();
        let events: Vec<_> = (0..30)
            .map(|i| event(&format!("2024-01-15 {:02}:00:00", i % 24), 40, "eye-closure"))
            .collect();
        let analysis = engine.analyze(&events);

        assert_eq!(analysis.stats.high_severity_events, 30);
        assert_eq!(analysis.risk.overall_risk, RiskTier::VeryHigh);
        assert_eq!(analysis.trend.len(), 1);
        assert_eq!(analysis.trend[0].risk_level, DailyRiskLevel::High);
        assert_eq!(
            analysis.risk.type_analysis,
            "Predominant fatigue type is \"eye-closure\", 100% of events"
        );
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let engine = FatigueAnalysisEngine::default();
        let events = vec![
            event("2024-01-15 09:00:00", 35, "yawn"),
            event("2024-01-16 23:00:00", 12, "blink"),
            event("2024-01-17 14:00:00", 18, "blink"),
        ];
        assert_eq!(engine.analyze(&events), engine.analyze(&events));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = RiskPolicy {
            trend_window_days: 0,
            ..Default::default()
        };
        assert!(FatigueAnalysisEngine::new(policy).is_err());
    }
}
