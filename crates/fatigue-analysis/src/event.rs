//! Fatigue event and driver identity types

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Timestamp layout used by the monitoring backend
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label used when an event carries no type
pub const UNKNOWN_TYPE: &str = "unknown type";

/// Label used when an event carries no location
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// A single detected fatigue occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatigueEvent {
    /// When the event was detected
    pub time: NaiveDateTime,
    /// How long it lasted (seconds)
    pub duration: u64,
    /// Event type (yawn, eye-closure, head-nod, blink, distraction, ...)
    pub kind: Option<String>,
    /// Where it happened, passed through untouched
    pub location: Option<String>,
}

impl FatigueEvent {
    /// Create an untyped event without location
    pub fn new(time: NaiveDateTime, duration: u64) -> Self {
        Self {
            time,
            duration,
            kind: None,
            location: None,
        }
    }

    /// Set the event type
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the event location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Type name used for grouping
    pub fn type_name(&self) -> &str {
        match self.kind.as_deref() {
            Some(kind) if !kind.is_empty() => kind,
            _ => UNKNOWN_TYPE,
        }
    }

    /// Location for display
    pub fn location_label(&self) -> &str {
        match self.location.as_deref() {
            Some(location) if !location.is_empty() => location,
            _ => UNKNOWN_LOCATION,
        }
    }

    /// Calendar date of the event
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    /// Hour of day (0-23)
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Severity derived from duration
    pub fn severity(&self) -> Severity {
        Severity::classify(self.duration)
    }

    /// Timestamp rendered in the backend layout
    pub fn time_label(&self) -> String {
        self.time.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Driver identity attached to a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UserIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// Phone number for display
    pub fn phone_label(&self) -> &str {
        self.phone.as_deref().filter(|p| !p.is_empty()).unwrap_or("not set")
    }

    /// Status for display; drivers without a status are treated as online
    pub fn status_label(&self) -> &str {
        self.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("online")
    }
}
