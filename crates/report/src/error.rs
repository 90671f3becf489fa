//! Report Error Types

use data_validator::ValidationError;
use fatigue_analysis::PolicyError;
use thiserror::Error;

/// Errors surfaced to report callers
///
/// Advisory failures never appear here; they are absorbed by the
/// recommendation step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Upstream data could not be converted into events
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] ValidationError),

    /// Generator was configured with an inconsistent risk policy
    #[error("Invalid risk policy: {0}")]
    Policy(#[from] PolicyError),
}
