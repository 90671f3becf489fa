//! Recommendation merging with provenance

use std::time::Duration;

use advisor::{AdvisoryError, AdvisoryService};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationSource {
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl RecommendationSource {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationSource::Ai => "ai",
            RecommendationSource::RuleBased => "rule-based",
        }
    }
}

/// One line of advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub content: String,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: RecommendationSource::Ai,
        }
    }

    pub fn rule_based(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: RecommendationSource::RuleBased,
        }
    }
}

/// Merged recommendations plus the absorbed advisory failure, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationSet {
    pub items: Vec<Recommendation>,
    pub advisory_error: Option<AdvisoryError>,
}

/// Ask the advisor, bounded by `timeout`
pub async fn request_advice<A: AdvisoryService>(
    advisor: &A,
    prompt: &str,
    timeout: Duration,
) -> Result<Vec<String>, AdvisoryError> {
    match tokio::time::timeout(timeout, advisor.advise(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(AdvisoryError::Timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

/// Combine advisory output with the rule-based list
///
/// AI advice comes first. When fewer than `min_ai` items were obtained the
/// rule-based list is appended; on failure it is used alone.
pub fn merge_recommendations(
    advice: Result<Vec<String>, AdvisoryError>,
    rule_based: Vec<String>,
    min_ai: usize,
) -> RecommendationSet {
    match advice {
        Ok(advice) => {
            let ai_count = advice.len();
            let mut items: Vec<Recommendation> = advice.into_iter().map(Recommendation::ai).collect();
            if ai_count < min_ai {
                debug!(
                    "Advisory returned {} items (< {}), appending rule-based list",
                    ai_count, min_ai
                );
                items.extend(rule_based.into_iter().map(Recommendation::rule_based));
            }
            RecommendationSet {
                items,
                advisory_error: None,
            }
        }
        Err(err) => {
            warn!("Advisory service unavailable, using rule-based recommendations: {}", err);
            RecommendationSet {
                items: rule_based.into_iter().map(Recommendation::rule_based).collect(),
                advisory_error: Some(err),
            }
        }
    }
}

/// Request advice and merge it with the rule-based list
pub async fn recommend<A: AdvisoryService>(
    advisor: &A,
    prompt: &str,
    timeout: Duration,
    rule_based: Vec<String>,
    min_ai: usize,
) -> RecommendationSet {
    let advice = request_advice(advisor, prompt, timeout).await;
    merge_recommendations(advice, rule_based, min_ai)
}
