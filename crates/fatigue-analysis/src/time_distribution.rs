//! Time-of-day distribution

use serde::{Deserialize, Serialize};

use crate::event::FatigueEvent;
use crate::statistics::percentage;

/// Fixed hour bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBand {
    /// [06, 12)
    Morning,
    /// [12, 18)
    Afternoon,
    /// [18, 22)
    Evening,
    /// [22, 24) and [00, 06)
    Night,
}

impl TimeBand {
    pub const ALL: [TimeBand; 4] = [
        TimeBand::Morning,
        TimeBand::Afternoon,
        TimeBand::Evening,
        TimeBand::Night,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeBand::Morning,
            12..=17 => TimeBand::Afternoon,
            18..=21 => TimeBand::Evening,
            _ => TimeBand::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeBand::Morning => "Morning (06-12)",
            TimeBand::Afternoon => "Afternoon (12-18)",
            TimeBand::Evening => "Evening (18-22)",
            TimeBand::Night => "Night (22-06)",
        }
    }
}

/// A value per band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandValues {
    pub morning: u64,
    pub afternoon: u64,
    pub evening: u64,
    pub night: u64,
}

impl BandValues {
    pub fn get(&self, band: TimeBand) -> u64 {
        match band {
            TimeBand::Morning => self.morning,
            TimeBand::Afternoon => self.afternoon,
            TimeBand::Evening => self.evening,
            TimeBand::Night => self.night,
        }
    }

    fn slot(&mut self, band: TimeBand) -> &mut u64 {
        match band {
            TimeBand::Morning => &mut self.morning,
            TimeBand::Afternoon => &mut self.afternoon,
            TimeBand::Evening => &mut self.evening,
            TimeBand::Night => &mut self.night,
        }
    }
}

/// Event counts and rounded percentages per band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub distribution: BandValues,
    pub percentages: BandValues,
}

/// Bucket events by hour of day
pub fn analyze_time_distribution(events: &[FatigueEvent]) -> TimeDistribution {
    let mut distribution = BandValues::default();
    for event in events {
        *distribution.slot(TimeBand::from_hour(event.hour())) += 1;
    }

    let total = events.len() as u64;
    let mut percentages = BandValues::default();
    for band in TimeBand::ALL {
        *percentages.slot(band) = percentage(distribution.get(band), total);
    }

    TimeDistribution {
        distribution,
        percentages,
    }
}
