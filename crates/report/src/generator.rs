//! Report generation

use std::time::Duration;

use advisor::{fleet_prompt, personal_prompt, AdvisoryService};
use chrono::Utc;
use data_validator::{RawUserRecord, ValidationConfig, Validator};
use fallback::FallbackEngine;
use fatigue_analysis::{FatigueAnalysisEngine, FatigueEvent, FleetUserSummary, RiskPolicy, UserIdentity};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ReportError;
use crate::fleet::FleetReport;
use crate::model::{DetailEventRow, FatigueReport, ReportOverview, ReportStatistics, TrendSection};
use crate::recommend::recommend;

/// Report assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Maximum rows in the event detail table
    pub detail_limit: usize,
    /// AI items below which the rule-based list is appended (driver report)
    pub min_ai_recommendations: usize,
    /// AI items below which the rule-based list is appended (fleet report)
    pub min_ai_fleet_recommendations: usize,
    /// Upper bound on a single advisory call (milliseconds)
    pub advisory_timeout_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            detail_limit: 50,
            min_ai_recommendations: 5,
            min_ai_fleet_recommendations: 6,
            advisory_timeout_ms: 15_000,
        }
    }
}

impl ReportConfig {
    pub fn advisory_timeout(&self) -> Duration {
        Duration::from_millis(self.advisory_timeout_ms)
    }
}

/// Builds driver and fleet reports
pub struct ReportGenerator<A> {
    engine: FatigueAnalysisEngine,
    validator: Validator,
    fallback: FallbackEngine,
    advisor: A,
    config: ReportConfig,
}

impl<A: AdvisoryService> ReportGenerator<A> {
    /// Create a generator with default policy and thresholds
    pub fn new(advisor: A) -> Self {
        Self {
            engine: FatigueAnalysisEngine::default(),
            validator: Validator::default(),
            fallback: FallbackEngine::default(),
            advisor,
            config: ReportConfig::default(),
        }
    }

    /// Create a generator with explicit configuration
    pub fn with_config(
        advisor: A,
        policy: RiskPolicy,
        validation: ValidationConfig,
        fallback: FallbackEngine,
        config: ReportConfig,
    ) -> Result<Self, ReportError> {
        Ok(Self {
            engine: FatigueAnalysisEngine::new(policy)?,
            validator: Validator::new(validation),
            fallback,
            advisor,
            config,
        })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn engine(&self) -> &FatigueAnalysisEngine {
        &self.engine
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate a raw record and build its report
    pub async fn generate(&self, record: &RawUserRecord) -> Result<FatigueReport, ReportError> {
        let validated = self.validator.validate_user(record)?;
        Ok(self.generate_for_events(&validated.user, &validated.events).await)
    }

    /// Build a report from already-typed events
    pub async fn generate_for_events(&self, user: &UserIdentity, events: &[FatigueEvent]) -> FatigueReport {
        let analysis = self.engine.analyze(events);

        let rule_based = self.fallback.personal(&analysis);
        let prompt = personal_prompt(&analysis, user);
        let recommendations = recommend(
            &self.advisor,
            &prompt,
            self.config.advisory_timeout(),
            rule_based,
            self.config.min_ai_recommendations,
        )
        .await;

        let detail_events = events
            .iter()
            .take(self.config.detail_limit)
            .enumerate()
            .map(|(i, event)| DetailEventRow::from_event(i, event))
            .collect();

        let statistics = ReportStatistics::from_analysis(&analysis);

        let risk = analysis.risk;
        let report = FatigueReport {
            overview: ReportOverview {
                report_id: Uuid::new_v4(),
                generated_at: Utc::now(),
                user: user.clone(),
                stats: analysis.stats,
                overall_risk: risk.overall_risk,
                risk_level: risk.risk_level,
                risk_score: risk.score,
                trend_analysis: risk.trend_analysis,
                type_analysis: risk.type_analysis,
            },
            detail_events,
            statistics,
            trend: TrendSection {
                days: analysis.trend,
                risk_factors: risk.risk_factors,
            },
            recommendations: recommendations.items,
            advisory_error: recommendations.advisory_error,
        };

        info!(
            "Generated report {} for {}: {} events, risk {}",
            report.overview.report_id,
            user.username,
            report.overview.stats.total_events,
            report.overview.overall_risk.label()
        );
        report
    }

    /// Build the fleet overview report
    pub async fn generate_fleet(&self, users: &[FleetUserSummary]) -> FleetReport {
        let fleet = self.engine.analyze_fleet(users);

        let rule_based = self.fallback.fleet(&fleet);
        let prompt = fleet_prompt(&fleet);
        let recommendations = recommend(
            &self.advisor,
            &prompt,
            self.config.advisory_timeout(),
            rule_based,
            self.config.min_ai_fleet_recommendations,
        )
        .await;

        debug!("Fleet recommendations: {}", recommendations.items.len());
        let report = FleetReport::assemble(fleet, recommendations);

        info!(
            "Generated fleet report {}: {} drivers, {} high risk",
            report.report_id,
            report.overview.total_users,
            report.high_risk.len()
        );
        report
    }
}
