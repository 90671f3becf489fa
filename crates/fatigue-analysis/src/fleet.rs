//! Fleet-wide rollup across drivers

use serde::{Deserialize, Serialize};

use crate::policy::FleetRiskPolicy;
use crate::statistics::round_div;

pub const FLEET_FACTOR_COUNT: &str = "Too many fatigue events";
pub const FLEET_FACTOR_DURATION: &str = "Fatigue duration too long";

/// Per-driver totals supplied by the monitoring backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetUserSummary {
    pub username: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub fatigue_count: u64,
    /// Total fatigue duration (seconds)
    #[serde(default)]
    pub fatigue_duration: u64,
}

impl FleetUserSummary {
    pub fn is_online(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("online"))
    }

    pub fn is_offline(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("offline"))
    }

    pub fn risk_level(&self, policy: &FleetRiskPolicy) -> FleetRiskLevel {
        if self.fatigue_count >= policy.high_count || self.fatigue_duration >= policy.high_duration {
            FleetRiskLevel::High
        } else if self.fatigue_count >= policy.medium_count
            || self.fatigue_duration >= policy.medium_duration
        {
            FleetRiskLevel::Medium
        } else {
            FleetRiskLevel::Low
        }
    }

    /// Reasons a driver is high risk
    pub fn risk_factors(&self, policy: &FleetRiskPolicy) -> Vec<String> {
        let mut factors = Vec::new();
        if self.fatigue_count >= policy.high_count {
            factors.push(FLEET_FACTOR_COUNT.to_string());
        }
        if self.fatigue_duration >= policy.high_duration {
            factors.push(FLEET_FACTOR_DURATION.to_string());
        }
        factors
    }
}

/// Per-driver risk in the fleet overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FleetRiskLevel {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
}

impl FleetRiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            FleetRiskLevel::High => "High",
            FleetRiskLevel::Medium => "Medium",
            FleetRiskLevel::Low => "Low",
        }
    }
}

/// Headline numbers for the fleet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOverview {
    pub total_users: u64,
    pub online_users: u64,
    pub offline_users: u64,
    pub total_fatigue_events: u64,
    pub total_fatigue_duration: u64,
    pub avg_fatigue_per_user: u64,
    pub avg_duration_per_user: u64,
}

/// Number of drivers at each risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Drivers by fatigue event count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountBuckets {
    pub none: u64,
    pub one_to_two: u64,
    pub three_to_four: u64,
    pub five_or_more: u64,
}

/// Drivers by total fatigue duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBuckets {
    pub up_to_20: u64,
    pub from_21_to_60: u64,
    pub from_61_to_120: u64,
    pub over_120: u64,
}

/// A driver with their assigned risk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedUser {
    #[serde(flatten)]
    pub user: FleetUserSummary,
    pub risk_level: FleetRiskLevel,
    pub risk_factors: Vec<String>,
}

/// Complete fleet rollup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetAnalysis {
    pub overview: FleetOverview,
    pub risk_distribution: RiskDistribution,
    pub count_buckets: CountBuckets,
    pub duration_buckets: DurationBuckets,
    /// Input order
    pub users: Vec<AssessedUser>,
    /// Most events first; equal counts keep input order
    pub by_fatigue_count: Vec<AssessedUser>,
    /// Longest duration first; equal durations keep input order
    pub by_fatigue_duration: Vec<AssessedUser>,
}

impl FleetAnalysis {
    /// High-risk drivers in input order
    pub fn high_risk_users(&self) -> impl Iterator<Item = &AssessedUser> {
        self.users
            .iter()
            .filter(|u| u.risk_level == FleetRiskLevel::High)
    }
}

/// Roll up per-driver totals
pub fn analyze_fleet(users: &[FleetUserSummary], policy: &FleetRiskPolicy) -> FleetAnalysis {
    let mut overview = FleetOverview {
        total_users: users.len() as u64,
        ..Default::default()
    };
    let mut risk_distribution = RiskDistribution::default();
    let mut count_buckets = CountBuckets::default();
    let mut duration_buckets = DurationBuckets::default();

    let assessed: Vec<AssessedUser> = users
        .iter()
        .map(|user| {
            if user.is_online() {
                overview.online_users += 1;
            } else if user.is_offline() {
                overview.offline_users += 1;
            }
            overview.total_fatigue_events = overview.total_fatigue_events.saturating_add(user.fatigue_count);
            overview.total_fatigue_duration = overview
                .total_fatigue_duration
                .saturating_add(user.fatigue_duration);

            match user.fatigue_count {
                0 => count_buckets.none += 1,
                1..=2 => count_buckets.one_to_two += 1,
                3..=4 => count_buckets.three_to_four += 1,
                _ => count_buckets.five_or_more += 1,
            }
            match user.fatigue_duration {
                0..=20 => duration_buckets.up_to_20 += 1,
                21..=60 => duration_buckets.from_21_to_60 += 1,
                61..=120 => duration_buckets.from_61_to_120 += 1,
                _ => duration_buckets.over_120 += 1,
            }

            let risk_level = user.risk_level(policy);
            match risk_level {
                FleetRiskLevel::High => risk_distribution.high += 1,
                FleetRiskLevel::Medium => risk_distribution.medium += 1,
                FleetRiskLevel::Low => risk_distribution.low += 1,
            }

            AssessedUser {
                user: user.clone(),
                risk_level,
                risk_factors: user.risk_factors(policy),
            }
        })
        .collect();

    overview.avg_fatigue_per_user = round_div(overview.total_fatigue_events, overview.total_users);
    overview.avg_duration_per_user = round_div(overview.total_fatigue_duration, overview.total_users);

    let mut by_fatigue_count = assessed.clone();
    by_fatigue_count.sort_by(|a, b| b.user.fatigue_count.cmp(&a.user.fatigue_count));
    let mut by_fatigue_duration = assessed.clone();
    by_fatigue_duration.sort_by(|a, b| b.user.fatigue_duration.cmp(&a.user.fatigue_duration));

    FleetAnalysis {
        overview,
        risk_distribution,
        count_buckets,
        duration_buckets,
        users: assessed,
        by_fatigue_count,
        by_fatigue_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, status: &str, count: u64, duration: u64) -> FleetUserSummary {
        FleetUserSummary {
            username: name.to_string(),
            phone: None,
            status: Some(status.to_string()),
            fatigue_count: count,
            fatigue_duration: duration,
        }
    }

    #[test]
    fn test_risk_levels_partition_users() {
        let policy = FleetRiskPolicy::default();
        assert_eq!(user("a", "online", 5, 0).risk_level(&policy), FleetRiskLevel::High);
        assert_eq!(user("a", "online", 0, 100).risk_level(&policy), FleetRiskLevel::High);
        assert_eq!(user("a", "online", 2, 0).risk_level(&policy), FleetRiskLevel::Medium);
        assert_eq!(user("a", "online", 0, 40).risk_level(&policy), FleetRiskLevel::Medium);
        assert_eq!(user("a", "online", 1, 39).risk_level(&policy), FleetRiskLevel::Low);
    }

    #[test]
    fn test_fleet_rollup() {
        let users = vec![
            user("chen", "online", 6, 150),
            user("zhao", "Offline", 2, 30),
            user("wang", "online", 0, 0),
            user("liu", "online", 6, 61),
        ];
        let fleet = analyze_fleet(&users, &FleetRiskPolicy::default());

        assert_eq!(fleet.overview.total_users, 4);
        assert_eq!(fleet.overview.online_users, 3);
        assert_eq!(fleet.overview.offline_users, 1);
        assert_eq!(fleet.overview.total_fatigue_events, 14);
        // 14 / 4 = 3.5
        assert_eq!(fleet.overview.avg_fatigue_per_user, 4);
        assert_eq!(fleet.overview.avg_duration_per_user, 60);

        assert_eq!(fleet.risk_distribution, RiskDistribution { high: 2, medium: 1, low: 1 });
        assert_eq!(fleet.count_buckets.five_or_more, 2);
        assert_eq!(fleet.count_buckets.none, 1);
        assert_eq!(fleet.duration_buckets.up_to_20, 1);
        assert_eq!(fleet.duration_buckets.from_61_to_120, 1);
        assert_eq!(fleet.duration_buckets.over_120, 1);

        let ranked: Vec<_> = fleet.by_fatigue_count.iter().map(|u| u.user.username.as_str()).collect();
        assert_eq!(ranked, vec!["chen", "liu", "zhao", "wang"]);

        let high: Vec<_> = fleet.high_risk_users().collect();
        assert_eq!(high.len(), 2);
        assert_eq!(high[0].risk_factors.len(), 2);
        assert_eq!(high[1].risk_factors, vec![FLEET_FACTOR_COUNT.to_string()]);
    }

    #[test]
    fn test_fleet_totals_saturate() {
        let users = vec![
            user("chen", "online", u64::MAX, u64::MAX),
            user("zhao", "online", u64::MAX, u64::MAX),
        ];
        let fleet = analyze_fleet(&users, &FleetRiskPolicy::default());

        assert_eq!(fleet.overview.total_fatigue_events, u64::MAX);
        assert_eq!(fleet.overview.total_fatigue_duration, u64::MAX);
        assert_eq!(fleet.overview.avg_fatigue_per_user, u64::MAX / 2 + 1);
        assert_eq!(fleet.risk_distribution.high, 2);
        assert_eq!(fleet.count_buckets.five_or_more, 2);
    }

    #[test]
    fn test_empty_fleet() {
        let fleet = analyze_fleet(&[], &FleetRiskPolicy::default());
        assert_eq!(fleet.overview, FleetOverview::default());
        assert!(fleet.users.is_empty());
    }
}
