//! Recommendation rules

use fatigue_analysis::{FatigueAnalysis, FleetAnalysis};
use serde::{Deserialize, Serialize};
use tracing::debug;

const URGENT: [&str; 3] = [
    "Stop driving immediately, rest for at least 8 hours and get a medical check-up",
    "Adjust the daily schedule to guarantee at least 7 hours of sleep",
    "Suspend long-haul assignments and switch to short or urban routes",
];

const MODERATE: [&str; 3] = [
    "Limit continuous driving and take a 15-20 minute break every 2 hours",
    "Avoid night driving and plan driving hours sensibly",
    "Exercise regularly to build stamina and resistance to fatigue",
];

const BASELINE: [&str; 2] = [
    "Overall fatigue status is good, keep maintaining regular rest habits",
    "Take periodic fatigue self-assessments to prevent fatigued driving",
];

const PREVENTIVE: [&str; 2] = [
    "Install a fatigue warning device to monitor driving state in real time",
    "Attend safe-driving training regularly to strengthen safety awareness",
];

const HEALTH_CHECK: &str =
    "Fatigue events are frequent, get a full medical examination to rule out health problems";
const REST_MORE: &str = "Increase rest frequency to avoid driving while fatigued";
const SLEEP_QUALITY: &str =
    "Too many high-severity fatigue events, sleep quality must improve immediately";
const DAY_SHIFTS: &str = "Night-time fatigue is frequent, consider switching to day shifts";

/// Fixed fleet management recommendations
pub const FLEET_RECOMMENDATIONS: [&str; 8] = [
    "Monitor high-risk drivers closely and increase their rest frequency",
    "Organize regular safe-driving training to raise driver safety awareness",
    "Set up a fatigue early-warning process to detect and handle fatigue promptly",
    "Plan driving shifts sensibly and avoid long continuous driving",
    "Strengthen driver health management with regular medical examinations",
    "Improve fatigue monitoring equipment for better accuracy and coverage",
    "Establish a fatigue event reporting and review procedure",
    "Draw up individual rest schedules for each driver",
];

/// Thresholds for the personal rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Risk level at or above which urgent measures apply
    pub urgent_risk_level: u8,
    /// Risk level at or above which moderate measures apply
    pub moderate_risk_level: u8,
    /// Event count above which a health check is advised
    pub many_events_above: u64,
    /// Event count above which more rest is advised
    pub some_events_above: u64,
    /// High-severity count above which sleep quality is flagged
    pub high_severity_above: u64,
    /// Share of night events (percent) above which day shifts are advised
    pub night_share_above_percent: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            urgent_risk_level: 4,
            moderate_risk_level: 3,
            many_events_above: 20,
            some_events_above: 10,
            high_severity_above: 5,
            night_share_above_percent: 30,
        }
    }
}

/// Rule-based recommendation engine
#[derive(Debug, Clone, Default)]
pub struct FallbackEngine {
    config: FallbackConfig,
}

impl FallbackEngine {
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }

    /// Recommendations for one driver; never empty
    pub fn personal(&self, analysis: &FatigueAnalysis) -> Vec<String> {
        let stats = &analysis.stats;
        let risk_level = analysis.risk.risk_level;
        let night = analysis.time_distribution.distribution.night;
        let mut recs: Vec<&str> = Vec::new();

        if risk_level >= self.config.urgent_risk_level {
            recs.extend(URGENT);
        } else if risk_level >= self.config.moderate_risk_level {
            recs.extend(MODERATE);
        }

        if stats.total_events > self.config.many_events_above {
            recs.push(HEALTH_CHECK);
        } else if stats.total_events > self.config.some_events_above {
            recs.push(REST_MORE);
        }

        if stats.high_severity_events > self.config.high_severity_above {
            recs.push(SLEEP_QUALITY);
        }

        if night * 100 > stats.total_events * self.config.night_share_above_percent {
            recs.push(DAY_SHIFTS);
        }

        if recs.is_empty() {
            recs.extend(BASELINE);
        }

        recs.extend(PREVENTIVE);

        debug!("Rule-based engine produced {} recommendations", recs.len());
        recs.into_iter().map(String::from).collect()
    }

    /// Recommendations for fleet management; never empty
    pub fn fleet(&self, _fleet: &FleetAnalysis) -> Vec<String> {
        FLEET_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
    }
}
