//! Raw record validation

use chrono::NaiveDateTime;
use fatigue_analysis::{FatigueEvent, UserIdentity, TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ValidationError;

/// Fatigue event as delivered by the monitoring backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFatigueEvent {
    pub time: String,
    pub duration: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RawFatigueEvent {
    pub fn new(time: impl Into<String>, duration: i64) -> Self {
        Self {
            time: time.into(),
            duration,
            kind: None,
            location: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// A driver and their events as delivered by the monitoring backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUserRecord {
    pub user: UserIdentity,
    #[serde(default)]
    pub events: Vec<RawFatigueEvent>,
}

/// A driver with typed events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUser {
    pub user: UserIdentity,
    pub events: Vec<FatigueEvent>,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// chrono layout of event timestamps
    pub timestamp_format: String,
    /// Reject records whose username is blank
    pub require_username: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TIMESTAMP_FORMAT.to_string(),
            require_username: true,
        }
    }
}

/// Result of a full diagnostic pass
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all events are valid
    pub valid: bool,
    /// Every error found
    pub errors: Vec<ValidationError>,
    /// Number of events examined
    pub events_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(events_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            events_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, events_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            events_checked,
        }
    }
}

/// Boundary validator for fatigue event batches
///
/// A batch is accepted whole or rejected whole: the first malformed event
/// fails the batch, so bad timestamps never reach the date and hour buckets.
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate one event
    pub fn validate_event(
        &self,
        index: usize,
        raw: &RawFatigueEvent,
    ) -> Result<FatigueEvent, ValidationError> {
        let time = NaiveDateTime::parse_from_str(raw.time.trim(), &self.config.timestamp_format)
            .map_err(|_| ValidationError::MalformedTimestamp {
                index,
                value: raw.time.clone(),
            })?;

        let duration = u64::try_from(raw.duration).map_err(|_| ValidationError::NegativeDuration {
            index,
            value: raw.duration,
        })?;

        Ok(FatigueEvent {
            time,
            duration,
            kind: raw.kind.clone(),
            location: raw.location.clone(),
        })
    }

    /// Convert a batch, failing on the first malformed event
    pub fn validate_events(
        &self,
        raw: &[RawFatigueEvent],
    ) -> Result<Vec<FatigueEvent>, ValidationError> {
        let events = raw
            .iter()
            .enumerate()
            .map(|(index, event)| self.validate_event(index, event))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                warn!("Rejecting event batch of {}: {}", raw.len(), e);
                e
            })?;

        debug!("Validated {} events", events.len());
        Ok(events)
    }

    /// Validate a driver record and its events
    pub fn validate_user(&self, record: &RawUserRecord) -> Result<ValidatedUser, ValidationError> {
        if self.config.require_username && record.user.username.trim().is_empty() {
            return Err(ValidationError::MissingField("user.username"));
        }

        Ok(ValidatedUser {
            user: record.user.clone(),
            events: self.validate_events(&record.events)?,
        })
    }

    /// Collect every error in a batch without stopping at the first
    pub fn check_events(&self, raw: &[RawFatigueEvent]) -> ValidationResult {
        let errors: Vec<_> = raw
            .iter()
            .enumerate()
            .filter_map(|(index, event)| self.validate_event(index, event).err())
            .collect();

        if errors.is_empty() {
            ValidationResult::valid(raw.len())
        } else {
            ValidationResult::invalid(errors, raw.len())
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_event() {
        let validator = Validator::default();
        let raw = RawFatigueEvent::new("2024-01-15 09:00:00", 35).with_kind("eye-closure");
        let event = validator.validate_event(0, &raw).unwrap();
        assert_eq!(event.duration, 35);
        assert_eq!(event.hour(), 9);
        assert_eq!(event.type_name(), "eye-closure");
    }

    #[test]
    fn test_malformed_timestamps() {
        let validator = Validator::default();
        for bad in ["", "2024-01-15", "2024-13-01 09:00:00", "2024-01-15T09:00:00", "yesterday"] {
            let err = validator.validate_event(3, &RawFatigueEvent::new(bad, 10)).unwrap_err();
            assert_eq!(
                err,
                ValidationError::MalformedTimestamp {
                    index: 3,
                    value: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn test_negative_duration() {
        let validator = Validator::default();
        let err = validator
            .validate_event(1, &RawFatigueEvent::new("2024-01-15 09:00:00", -4))
            .unwrap_err();
        assert_eq!(err, ValidationError::NegativeDuration { index: 1, value: -4 });
        assert_eq!(err.event_index(), Some(1));
    }

    #[test]
    fn test_batch_rejected_whole() {
        let validator = Validator::default();
        let batch = vec![
            RawFatigueEvent::new("2024-01-15 09:00:00", 10),
            RawFatigueEvent::new("not a time", 10),
            RawFatigueEvent::new("2024-01-15 10:00:00", -1),
        ];
        let err = validator.validate_events(&batch).unwrap_err();
        assert_eq!(err.event_index(), Some(1));

        let result = validator.check_events(&batch);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.events_checked, 3);
    }

    #[test]
    fn test_user_record() {
        let validator = Validator::default();
        let record: RawUserRecord = serde_json::from_str(
            r#"{
                "user": {"username": "li.wei", "phone": "13800000000"},
                "events": [{"time": "2024-01-15 09:00:00", "duration": 20, "type": "yawn", "location": "G4 km 120"}]
            }"#,
        )
        .unwrap();
        let validated = validator.validate_user(&record).unwrap();
        assert_eq!(validated.events.len(), 1);
        assert_eq!(validated.events[0].location_label(), "G4 km 120");

        let blank = RawUserRecord {
            user: UserIdentity::new("  "),
            events: vec![],
        };
        assert_eq!(
            validator.validate_user(&blank),
            Err(ValidationError::MissingField("user.username"))
        );
    }

    proptest! {
        #[test]
        fn accepted_durations_are_preserved(duration in 0i64..1_000_000) {
            let validator = Validator::default();
            let event = validator
                .validate_event(0, &RawFatigueEvent::new("2024-02-29 23:59:59", duration))
                .unwrap();
            prop_assert_eq!(event.duration, duration as u64);
        }
    }
}
