//! Per-event severity classification
//!
//! The two duration thresholds below are the only place severity is defined.
//! Detail rows, aggregate counts, and the daily trend all go through
//! [`Severity::classify`].

use serde::{Deserialize, Serialize};

/// Events lasting at least this long are high severity (seconds)
pub const HIGH_SEVERITY_SECS: u64 = 30;

/// Events lasting at least this long are medium severity (seconds)
pub const MEDIUM_SEVERITY_SECS: u64 = 15;

/// Severity of a single fatigue event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classify an event by its duration in seconds
    pub fn classify(duration_secs: u64) -> Self {
        if duration_secs >= HIGH_SEVERITY_SECS {
            Severity::High
        } else if duration_secs >= MEDIUM_SEVERITY_SECS {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// All levels, highest first
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Classify an event duration
pub fn classify_severity(duration_secs: u64) -> Severity {
    Severity::classify(duration_secs)
}
