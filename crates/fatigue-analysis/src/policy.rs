//! Risk scoring policy
//!
//! The breakpoints are a heuristic, not a fitted model. The defaults match
//! the values existing reports were produced with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Policy validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Tier floors must strictly decrease from very high to low
    #[error("Risk tier floors must be strictly decreasing: {0:?}")]
    TierFloorsNotDecreasing([u32; 4]),

    /// Daily floors must strictly decrease from high to medium
    #[error("Daily risk floors must satisfy high > medium (high={high}, medium={medium})")]
    DailyFloorsNotDecreasing { high: u32, medium: u32 },

    /// The trend window must hold at least one day
    #[error("Trend window must be at least one day")]
    EmptyTrendWindow,
}

/// Points awarded when a value is strictly above a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub above: u64,
    pub points: u32,
}

impl Breakpoint {
    pub const fn new(above: u64, points: u32) -> Self {
        Self { above, points }
    }
}

/// Points for `value`: the best breakpoint it clears, or zero
pub fn points_for(breakpoints: &[Breakpoint], value: u64) -> u32 {
    breakpoints
        .iter()
        .filter(|b| value > b.above)
        .map(|b| b.points)
        .max()
        .unwrap_or(0)
}

/// Minimum scores for each overall tier above "Very Low"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFloors {
    pub very_high: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for TierFloors {
    fn default() -> Self {
        Self {
            very_high: 12,
            high: 9,
            medium: 6,
            low: 3,
        }
    }
}

/// Thresholds that add a qualitative risk factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorThresholds {
    /// High-severity events above this add a factor
    pub high_severity_above: u64,
    /// Average duration above this adds a factor (seconds)
    pub avg_duration_above: u64,
    /// Total events above this add a factor
    pub total_events_above: u64,
}

impl Default for FactorThresholds {
    fn default() -> Self {
        Self {
            high_severity_above: 5,
            avg_duration_above: 25,
            total_events_above: 20,
        }
    }
}

/// Weights for the per-day risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRiskWeights {
    /// Weight of each high-severity event
    pub high_weight: u32,
    /// Weight of every other event
    pub other_weight: u32,
    /// Average duration above which the bonus applies (seconds)
    pub long_average_above: u64,
    /// Bonus for a long daily average
    pub long_average_bonus: u32,
    /// Score at which the day is high risk
    pub high_floor: u32,
    /// Score at which the day is medium risk
    pub medium_floor: u32,
}

impl Default for DailyRiskWeights {
    fn default() -> Self {
        Self {
            high_weight: 3,
            other_weight: 1,
            long_average_above: 25,
            long_average_bonus: 2,
            high_floor: 10,
            medium_floor: 5,
        }
    }
}

/// Per-driver thresholds for the fleet overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRiskPolicy {
    pub high_count: u64,
    pub high_duration: u64,
    pub medium_count: u64,
    pub medium_duration: u64,
}

impl Default for FleetRiskPolicy {
    fn default() -> Self {
        Self {
            high_count: 5,
            high_duration: 100,
            medium_count: 2,
            medium_duration: 40,
        }
    }
}

/// Complete scoring policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Points by total event count
    pub total_events: Vec<Breakpoint>,
    /// Points by high-severity event count
    pub high_severity_events: Vec<Breakpoint>,
    /// Points by average duration (seconds)
    pub avg_duration: Vec<Breakpoint>,
    pub tier_floors: TierFloors,
    pub factors: FactorThresholds,
    pub daily: DailyRiskWeights,
    pub fleet: FleetRiskPolicy,
    /// Number of most recent dates kept in the trend
    pub trend_window_days: usize,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            total_events: vec![
                Breakpoint::new(25, 4),
                Breakpoint::new(15, 3),
                Breakpoint::new(8, 2),
                Breakpoint::new(3, 1),
            ],
            high_severity_events: vec![
                Breakpoint::new(8, 5),
                Breakpoint::new(5, 4),
                Breakpoint::new(3, 3),
                Breakpoint::new(1, 2),
            ],
            avg_duration: vec![
                Breakpoint::new(30, 3),
                Breakpoint::new(20, 2),
                Breakpoint::new(15, 1),
            ],
            tier_floors: TierFloors::default(),
            factors: FactorThresholds::default(),
            daily: DailyRiskWeights::default(),
            fleet: FleetRiskPolicy::default(),
            trend_window_days: 7,
        }
    }
}

impl RiskPolicy {
    /// Check internal consistency
    pub fn validate(&self) -> Result<(), PolicyError> {
        let f = self.tier_floors;
        if !(f.very_high > f.high && f.high > f.medium && f.medium > f.low) {
            return Err(PolicyError::TierFloorsNotDecreasing([
                f.very_high,
                f.high,
                f.medium,
                f.low,
            ]));
        }
        if self.daily.high_floor <= self.daily.medium_floor {
            return Err(PolicyError::DailyFloorsNotDecreasing {
                high: self.daily.high_floor,
                medium: self.daily.medium_floor,
            });
        }
        if self.trend_window_days == 0 {
            return Err(PolicyError::EmptyTrendWindow);
        }
        Ok(())
    }
}
