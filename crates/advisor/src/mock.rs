//! In-process advisory services

use std::time::Duration;

use crate::{AdvisoryError, AdvisoryService};

/// Always reports the service as disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAdvisor;

impl AdvisoryService for DisabledAdvisor {
    async fn advise(&self, _prompt: &str) -> Result<Vec<String>, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }
}

/// Returns a fixed outcome, optionally after a delay
#[derive(Debug, Clone)]
pub struct StaticAdvisor {
    outcome: Result<Vec<String>, AdvisoryError>,
    delay: Option<Duration>,
}

impl StaticAdvisor {
    pub fn advice<I, S>(advice: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcome: Ok(advice.into_iter().map(Into::into).collect()),
            delay: None,
        }
    }

    pub fn failing(error: AdvisoryError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl AdvisoryService for StaticAdvisor {
    async fn advise(&self, _prompt: &str) -> Result<Vec<String>, AdvisoryError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
