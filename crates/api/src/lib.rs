//! Fatigue Report API Server
//!
//! HTTP front end for driver and fleet fatigue reports.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
mod routes;

pub use crate::config::ServiceConfig;
pub use error::ApiError;

use advisor::{AdvisoryService, HttpAdvisor};
use crate::config::LoggingConfig;
use fallback::FallbackEngine;
use rate_limit::{create_governor_config, RateLimitConfig};
use report::{ReportError, ReportGenerator};

/// Application state shared across handlers
pub struct AppState<A = HttpAdvisor> {
    pub generator: ReportGenerator<A>,
    /// Prometheus exposition handle
    pub metrics: PrometheusHandle,
    pub advisor_enabled: bool,
    pub version: String,
    pub start_time: std::time::Instant,
}

impl<A: AdvisoryService> AppState<A> {
    pub fn new(generator: ReportGenerator<A>, metrics: PrometheusHandle, advisor_enabled: bool) -> Self {
        Self {
            generator,
            metrics,
            advisor_enabled,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

impl AppState<HttpAdvisor> {
    /// Build state with the HTTP advisory client
    pub fn from_config(config: &ServiceConfig, metrics: PrometheusHandle) -> Result<Self, ReportError> {
        let generator = ReportGenerator::with_config(
            HttpAdvisor::new(config.advisor.clone()),
            config.policy.clone(),
            config.validation.clone(),
            FallbackEngine::new(config.fallback.clone()),
            config.report.clone(),
        )?;
        Ok(Self::new(generator, metrics, config.advisor.enabled))
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub analysis: String,
    pub advisor: String,
}

/// Create the application router
pub fn create_router<A>(state: Arc<AppState<A>>, rate_limit: &RateLimitConfig) -> Router
where
    A: AdvisoryService + 'static,
{
    let reports = Router::new()
        .route("/api/v1/reports/user", post(routes::reports::user_report::<A>))
        .route("/api/v1/reports/fleet", post(routes::reports::fleet_report::<A>));

    let reports = if rate_limit.enabled {
        match create_governor_config(rate_limit) {
            Some(config) => reports.layer(GovernorLayer { config }),
            None => {
                warn!("Rate limit configuration rejected, report endpoints are unthrottled");
                reports
            }
        }
    } else {
        reports
    };

    Router::new()
        .route("/api/v1/health", get(health_handler::<A>))
        .route("/metrics", get(metrics_handler::<A>))
        .merge(reports)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler<A: AdvisoryService>(State(state): State<Arc<AppState<A>>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            analysis: "ok".to_string(),
            advisor: if state.advisor_enabled { "enabled" } else { "disabled" }.to_string(),
        },
    })
}

/// Prometheus exposition
async fn metrics_handler<A: AdvisoryService>(State(state): State<Arc<AppState<A>>>) -> String {
    state.metrics.render()
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Run the server
pub async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(AppState::from_config(&config, metrics)?);
    let app = create_router(state, &config.rate_limit);
    let addr = config.socket_addr()?;

    info!(
        "Starting API server on {} (advisor {})",
        addr,
        if config.advisor.enabled { "enabled" } else { "disabled" }
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
