//! Fleet report model

use advisor::AdvisoryError;
use chrono::{DateTime, Utc};
use fatigue_analysis::{
    percentage, AssessedUser, CountBuckets, DurationBuckets, FleetAnalysis, FleetOverview,
    FleetRiskLevel, RiskDistribution,
};
use serde::Serialize;
use uuid::Uuid;

use crate::recommend::{Recommendation, RecommendationSet};

/// Rows in the headline ranking
pub const OVERVIEW_TOP: usize = 5;
/// Rows in the leaderboard
pub const LEADERBOARD_TOP: usize = 10;

/// One driver in a fleet table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetUserRow {
    /// 1-based row or rank
    pub rank: usize,
    pub username: String,
    pub phone: String,
    pub status: String,
    pub fatigue_count: u64,
    pub fatigue_duration: u64,
    pub risk_level: FleetRiskLevel,
    pub risk_factors: Vec<String>,
}

impl FleetUserRow {
    fn from_assessed(rank: usize, assessed: &AssessedUser) -> Self {
        let user = &assessed.user;
        Self {
            rank,
            username: user.username.clone(),
            phone: user
                .phone
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or("not set")
                .to_string(),
            status: user.status.clone().unwrap_or_default(),
            fatigue_count: user.fatigue_count,
            fatigue_duration: user.fatigue_duration,
            risk_level: assessed.risk_level,
            risk_factors: assessed.risk_factors.clone(),
        }
    }
}

fn ranked<'a>(users: impl Iterator<Item = &'a AssessedUser>) -> Vec<FleetUserRow> {
    users
        .enumerate()
        .map(|(i, user)| FleetUserRow::from_assessed(i + 1, user))
        .collect()
}

/// A count with its share of all drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Share {
    pub count: u64,
    pub percentage: u64,
}

impl Share {
    fn of(count: u64, total: u64) -> Self {
        Self {
            count,
            percentage: percentage(count, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusShares {
    pub online: Share,
    pub offline: Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskShares {
    pub high: Share,
    pub medium: Share,
    pub low: Share,
}

/// Breakdown tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStatistics {
    pub by_status: StatusShares,
    pub by_risk: RiskShares,
    pub count_buckets: CountBuckets,
    pub duration_buckets: DurationBuckets,
}

impl FleetStatistics {
    fn new(
        overview: &FleetOverview,
        risk: &RiskDistribution,
        count_buckets: CountBuckets,
        duration_buckets: DurationBuckets,
    ) -> Self {
        let total = overview.total_users;
        Self {
            by_status: StatusShares {
                online: Share::of(overview.online_users, total),
                offline: Share::of(overview.offline_users, total),
            },
            by_risk: RiskShares {
                high: Share::of(risk.high, total),
                medium: Share::of(risk.medium, total),
                low: Share::of(risk.low, total),
            },
            count_buckets,
            duration_buckets,
        }
    }
}

/// Complete fleet report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub overview: FleetOverview,
    pub risk_distribution: RiskDistribution,
    /// Input order
    pub users: Vec<FleetUserRow>,
    pub statistics: FleetStatistics,
    /// Most fatigue events, headline
    pub top_by_count: Vec<FleetUserRow>,
    /// Most fatigue events, leaderboard
    pub leaderboard: Vec<FleetUserRow>,
    /// Longest total fatigue, headline
    pub top_by_duration: Vec<FleetUserRow>,
    pub high_risk: Vec<FleetUserRow>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip)]
    pub advisory_error: Option<AdvisoryError>,
}

impl FleetReport {
    pub fn assemble(fleet: FleetAnalysis, recommendations: RecommendationSet) -> Self {
        let statistics = FleetStatistics::new(
            &fleet.overview,
            &fleet.risk_distribution,
            fleet.count_buckets,
            fleet.duration_buckets,
        );

        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            overview: fleet.overview,
            risk_distribution: fleet.risk_distribution,
            users: ranked(fleet.users.iter()),
            statistics,
            top_by_count: ranked(fleet.by_fatigue_count.iter().take(OVERVIEW_TOP)),
            leaderboard: ranked(fleet.by_fatigue_count.iter().take(LEADERBOARD_TOP)),
            top_by_duration: ranked(fleet.by_fatigue_duration.iter().take(OVERVIEW_TOP)),
            high_risk: ranked(fleet.high_risk_users()),
            recommendations: recommendations.items,
            advisory_error: recommendations.advisory_error,
        }
    }
}
