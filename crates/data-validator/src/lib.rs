//! Fatigue Record Validation
//!
//! Converts raw backend records into typed fatigue events. Malformed
//! timestamps and negative durations reject the whole batch.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{
    RawFatigueEvent, RawUserRecord, ValidatedUser, ValidationConfig, ValidationResult, Validator,
};
