//! Driver report model

use advisor::AdvisoryError;
use chrono::{DateTime, Utc};
use fatigue_analysis::{
    percentage, AggregateStats, FatigueAnalysis, FatigueEvent, RiskTier, Severity, TimeBand,
    TrendPoint, UserIdentity,
};
use serde::Serialize;
use uuid::Uuid;

use crate::recommend::Recommendation;

/// Headline section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOverview {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub user: UserIdentity,
    pub stats: AggregateStats,
    pub overall_risk: RiskTier,
    pub risk_level: u8,
    pub risk_score: u32,
    pub trend_analysis: String,
    pub type_analysis: String,
}

/// One row of the event detail table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailEventRow {
    /// 1-based position in the input
    pub index: usize,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: u64,
    pub severity: Severity,
    pub location: String,
}

impl DetailEventRow {
    pub fn from_event(index: usize, event: &FatigueEvent) -> Self {
        Self {
            index: index + 1,
            time: event.time_label(),
            kind: event.type_name().to_string(),
            duration: event.duration,
            severity: event.severity(),
            location: event.location_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRow {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
    pub percentage: u64,
    pub avg_duration: u64,
    pub max_duration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityRow {
    pub severity: Severity,
    pub count: u64,
    pub percentage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBandRow {
    pub band: TimeBand,
    pub count: u64,
    pub percentage: u64,
}

/// Breakdown tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub by_type: Vec<TypeRow>,
    pub by_severity: Vec<SeverityRow>,
    pub by_time_band: Vec<TimeBandRow>,
}

impl ReportStatistics {
    pub fn from_analysis(analysis: &FatigueAnalysis) -> Self {
        let total = analysis.stats.total_events;

        let by_type = analysis
            .type_stats
            .iter()
            .map(|(kind, summary)| TypeRow {
                kind: kind.clone(),
                count: summary.count,
                percentage: percentage(summary.count, total),
                avg_duration: summary.avg_duration,
                max_duration: summary.max_duration,
            })
            .collect();

        let by_severity = Severity::ALL
            .iter()
            .map(|&severity| {
                let count = analysis.stats.count_for(severity);
                SeverityRow {
                    severity,
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect();

        let time = &analysis.time_distribution;
        let by_time_band = TimeBand::ALL
            .iter()
            .map(|&band| TimeBandRow {
                band,
                count: time.distribution.get(band),
                percentage: time.percentages.get(band),
            })
            .collect();

        Self {
            by_type,
            by_severity,
            by_time_band,
        }
    }
}

/// Daily trend with the contributing risk factors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSection {
    pub days: Vec<TrendPoint>,
    pub risk_factors: Vec<String>,
}

/// Complete single-driver report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueReport {
    pub overview: ReportOverview,
    pub detail_events: Vec<DetailEventRow>,
    pub statistics: ReportStatistics,
    pub trend: TrendSection,
    pub recommendations: Vec<Recommendation>,
    /// Absorbed advisory failure, kept for observability only
    #[serde(skip)]
    pub advisory_error: Option<AdvisoryError>,
}
