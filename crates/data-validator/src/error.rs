//! Validation Error Types

use thiserror::Error;

/// Malformed input rejected at the boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Timestamp does not match the expected layout
    #[error("Event {index}: malformed timestamp {value:?}")]
    MalformedTimestamp { index: usize, value: String },

    /// Duration below zero
    #[error("Event {index}: negative duration {value}")]
    NegativeDuration { index: usize, value: i64 },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Index of the offending event, if the error is per-event
    pub fn event_index(&self) -> Option<usize> {
        match self {
            ValidationError::MalformedTimestamp { index, .. }
            | ValidationError::NegativeDuration { index, .. } => Some(*index),
            ValidationError::MissingField(_) => None,
        }
    }
}
