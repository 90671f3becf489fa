//! Overall risk assessment

use serde::{Deserialize, Serialize};

use crate::policy::{points_for, RiskPolicy, TierFloors};
use crate::statistics::{dominant_type, percentage, AggregateStats, TypeStats};
use crate::trend::TrendPoint;

pub const FACTOR_FREQUENT_HIGH_SEVERITY: &str =
    "High-severity fatigue events are frequent, a serious safety hazard";
pub const FACTOR_LONG_DURATION: &str =
    "Fatigue episodes last too long, attention is noticeably degraded";
pub const FACTOR_MANY_EVENTS: &str =
    "Total fatigue events are high, the rest schedule needs adjusting";

pub const TREND_INCREASING: &str =
    "Fatigue events are trending upward recently and need close attention";
pub const TREND_STABLE: &str = "Fatigue events have been relatively stable recently";

/// Five-tier overall risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Very Low")]
    VeryLow,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskTier {
    /// Map a raw score onto a tier
    pub fn from_score(score: u32, floors: &TierFloors) -> Self {
        if score >= floors.very_high {
            RiskTier::VeryHigh
        } else if score >= floors.high {
            RiskTier::High
        } else if score >= floors.medium {
            RiskTier::Medium
        } else if score >= floors.low {
            RiskTier::Low
        } else {
            RiskTier::VeryLow
        }
    }

    /// Integer level, 1 (very low) to 5 (very high)
    pub fn level(&self) -> u8 {
        match self {
            RiskTier::VeryLow => 1,
            RiskTier::Low => 2,
            RiskTier::Medium => 3,
            RiskTier::High => 4,
            RiskTier::VeryHigh => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::VeryLow => "Very Low",
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
        }
    }
}

/// Aggregate risk for one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk: RiskTier,
    /// 1-5, same banding as `overall_risk`
    pub risk_level: u8,
    /// Raw additive score
    pub score: u32,
    pub risk_factors: Vec<String>,
    /// Blank when fewer than three trend days exist
    pub trend_analysis: String,
    /// Blank when there are no events
    pub type_analysis: String,
}

/// Additive score from the three independent rules
pub fn risk_score(stats: &AggregateStats, policy: &RiskPolicy) -> u32 {
    points_for(&policy.total_events, stats.total_events)
        + points_for(&policy.high_severity_events, stats.high_severity_events)
        + points_for(&policy.avg_duration, stats.avg_duration)
}

/// Assess overall risk from the derived statistics
pub fn assess_risk(
    stats: &AggregateStats,
    type_stats: &TypeStats,
    trend: &[TrendPoint],
    policy: &RiskPolicy,
) -> RiskAssessment {
    let score = risk_score(stats, policy);
    let tier = RiskTier::from_score(score, &policy.tier_floors);

    let mut risk_factors = Vec::new();
    if stats.high_severity_events > policy.factors.high_severity_above {
        risk_factors.push(FACTOR_FREQUENT_HIGH_SEVERITY.to_string());
    }
    if stats.avg_duration > policy.factors.avg_duration_above {
        risk_factors.push(FACTOR_LONG_DURATION.to_string());
    }
    if stats.total_events > policy.factors.total_events_above {
        risk_factors.push(FACTOR_MANY_EVENTS.to_string());
    }

    RiskAssessment {
        overall_risk: tier,
        risk_level: tier.level(),
        score,
        risk_factors,
        trend_analysis: trend_analysis(trend),
        type_analysis: type_analysis(type_stats, stats.total_events),
    }
}

/// Compare the last of the final three trend days against the first of them
fn trend_analysis(trend: &[TrendPoint]) -> String {
    if trend.len() < 3 {
        return String::new();
    }
    let recent = &trend[trend.len() - 3..];
    if recent[2].day.count > recent[0].day.count {
        TREND_INCREASING.to_string()
    } else {
        TREND_STABLE.to_string()
    }
}

fn type_analysis(type_stats: &TypeStats, total_events: u64) -> String {
    match dominant_type(type_stats) {
        Some((name, summary)) => format!(
            "Predominant fatigue type is \"{}\", {}% of events",
            name,
            percentage(summary.count, total_events)
        ),
        None => String::new(),
    }
}
