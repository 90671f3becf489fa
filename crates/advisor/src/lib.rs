//! Advisory Service
//!
//! Best-effort free-text recommendations from an OpenAI-compatible
//! chat-completions endpoint. Callers must treat every error as recoverable
//! and fall back to the rule-based engine.

mod client;
mod mock;
mod parse;
mod prompt;

pub use client::{AdvisorConfig, HttpAdvisor};
pub use mock::{DisabledAdvisor, StaticAdvisor};
pub use parse::parse_advice;
pub use prompt::{fleet_prompt, personal_prompt};

use std::future::Future;

use thiserror::Error;

/// Errors from the advisory service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    #[error("Advisory service is disabled")]
    Disabled,
    #[error("Advisory API key not configured")]
    MissingApiKey,
    #[error("Advisory request timed out after {0}ms")]
    Timeout(u64),
    #[error("Advisory network error: {0}")]
    Network(String),
    #[error("Advisory API error: status={status}, message={message}")]
    Api { status: u16, message: String },
    #[error("Malformed advisory response: {0}")]
    MalformedResponse(String),
    #[error("Advisory service returned no usable advice")]
    Empty,
}

/// A source of free-text advice
pub trait AdvisoryService: Send + Sync {
    /// Short advice strings for a natural-language prompt
    fn advise(&self, prompt: &str) -> impl Future<Output = Result<Vec<String>, AdvisoryError>> + Send;
}
