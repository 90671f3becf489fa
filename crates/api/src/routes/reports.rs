//! Report Routes

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use data_validator::RawUserRecord;
use fatigue_analysis::FleetUserSummary;
use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use advisor::AdvisoryService;
use report::{DocumentLayout, Recommendation, RecommendationSource, ReportLayout, WorkbookLayout};

use crate::{ApiError, AppState};

/// Output arrangement requested by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// The report model as-is
    #[default]
    Model,
    Workbook,
    Document,
}

#[derive(Debug, Default, Deserialize)]
pub struct LayoutQuery {
    #[serde(default)]
    pub layout: Layout,
}

/// Request body for the fleet report
#[derive(Debug, Deserialize)]
pub struct FleetReportRequest {
    pub users: Vec<FleetUserSummary>,
}

fn record_outcome(kind: &'static str, recommendations: &[Recommendation], advisory_failed: bool) {
    counter!("reports_generated_total", "kind" => kind).increment(1);

    for source in [RecommendationSource::Ai, RecommendationSource::RuleBased] {
        let count = recommendations.iter().filter(|r| r.source == source).count() as u64;
        if count > 0 {
            counter!("recommendations_total", "source" => source.label()).increment(count);
        }
    }

    if advisory_failed {
        counter!("advisory_failures_total", "kind" => kind).increment(1);
    }
}

fn render<T, W, D>(layout: Layout, report: &T, workbook: W, document: D) -> Response
where
    T: serde::Serialize,
    W: FnOnce(&T) -> Response,
    D: FnOnce(&T) -> Response,
{
    match layout {
        Layout::Model => Json(report).into_response(),
        Layout::Workbook => workbook(report),
        Layout::Document => document(report),
    }
}

/// Generate a single driver report
pub async fn user_report<A: AdvisoryService>(
    State(state): State<Arc<AppState<A>>>,
    Query(query): Query<LayoutQuery>,
    Json(record): Json<RawUserRecord>,
) -> Result<Response, ApiError> {
    let check = state.generator.validator().check_events(&record.events);
    if !check.valid {
        debug!(
            "Rejecting report for {}: {} of {} events invalid",
            record.user.username,
            check.errors.len(),
            check.events_checked
        );
        return Err(ApiError::Validation(check.errors));
    }

    let report = state.generator.generate(&record).await?;
    record_outcome("driver", &report.recommendations, report.advisory_error.is_some());

    Ok(render(
        query.layout,
        &report,
        |r| Json(WorkbookLayout.driver(r)).into_response(),
        |r| Json(DocumentLayout.driver(r)).into_response(),
    ))
}

/// Generate the fleet overview report
pub async fn fleet_report<A: AdvisoryService>(
    State(state): State<Arc<AppState<A>>>,
    Query(query): Query<LayoutQuery>,
    Json(request): Json<FleetReportRequest>,
) -> Response {
    let report = state.generator.generate_fleet(&request.users).await;
    record_outcome("fleet", &report.recommendations, report.advisory_error.is_some());

    render(
        query.layout,
        &report,
        |r| Json(WorkbookLayout.fleet(r)).into_response(),
        |r| Json(DocumentLayout.fleet(r)).into_response(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_router, rate_limit::RateLimitConfig};
    use advisor::{DisabledAdvisor, StaticAdvisor};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use report::ReportGenerator;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app<A: AdvisoryService + 'static>(advisor: A) -> Router {
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        let state = Arc::new(AppState::new(ReportGenerator::new(advisor), metrics, false));
        create_router(state, &RateLimitConfig::disabled())
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn driver_body() -> Value {
        json!({
            "user": {"username": "li.wei", "phone": "13800000000"},
            "events": [
                {"time": "2024-01-15 09:00:00", "duration": 35, "type": "yawn", "location": "G4 km 120"},
                {"time": "2024-01-15 23:10:00", "duration": 12, "type": "blink"}
            ]
        })
    }

    #[tokio::test]
    async fn test_user_report_model() {
        let (status, body) = post(app(DisabledAdvisor), "/api/v1/reports/user", driver_body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overview"]["stats"]["totalEvents"], 2);
        assert_eq!(body["overview"]["user"]["username"], "li.wei");
        assert_eq!(body["detailEvents"][0]["type"], "yawn");
        assert_eq!(body["recommendations"][0]["source"], "rule-based");
    }

    #[tokio::test]
    async fn test_user_report_layouts() {
        let (status, body) = post(
            app(DisabledAdvisor),
            "/api/v1/reports/user?layout=workbook",
            driver_body(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sheets"].as_array().unwrap().len(), 5);

        let (_, body) = post(
            app(DisabledAdvisor),
            "/api/v1/reports/user?layout=document",
            driver_body(),
        )
        .await;
        assert_eq!(body["title"], "Driver Fatigue Monitoring Report");
    }

    #[tokio::test]
    async fn test_malformed_events_list_every_error() {
        let body = json!({
            "user": {"username": "li.wei"},
            "events": [
                {"time": "2024-01-15 09:00:00", "duration": 35},
                {"time": "15/01/2024", "duration": 10},
                {"time": "2024-01-15 10:00:00", "duration": -5}
            ]
        });
        let (status, body) = post(app(DisabledAdvisor), "/api/v1/reports/user", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "malformed_input");
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ai_recommendations_tagged() {
        let advisor = StaticAdvisor::advice([
            "Plan a rest stop every two hours",
            "Avoid driving between midnight and 5am",
            "Keep the cabin well ventilated",
            "Sleep at least seven hours before a shift",
            "Stay hydrated on long routes",
        ]);
        let (_, body) = post(app(advisor), "/api/v1/reports/user", driver_body()).await;
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 5);
        assert!(recs.iter().all(|r| r["source"] == "ai"));
    }

    #[tokio::test]
    async fn test_fleet_report() {
        let body = json!({
            "users": [
                {"username": "a", "status": "online", "fatigueCount": 7, "fatigueDuration": 30},
                {"username": "b", "status": "offline", "fatigueCount": 0, "fatigueDuration": 0}
            ]
        });
        let (status, body) = post(app(DisabledAdvisor), "/api/v1/reports/fleet", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overview"]["totalUsers"], 2);
        assert_eq!(body["highRisk"][0]["username"], "a");
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_fleet_report_layouts() {
        let body = json!({"users": [{"username": "a", "status": "online", "fatigueCount": 3}]});

        let (status, workbook) = post(app(DisabledAdvisor), "/api/v1/reports/fleet?layout=workbook", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(workbook["sheets"].as_array().unwrap().len(), 5);

        let (status, document) = post(app(DisabledAdvisor), "/api/v1/reports/fleet?layout=document", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(document["title"], "Fleet Fatigue Monitoring Report");
    }

    #[tokio::test]
    async fn test_fleet_report_with_extreme_totals() {
        let body = json!({
            "users": [
                {"username": "a", "status": "online", "fatigueCount": u64::MAX, "fatigueDuration": u64::MAX},
                {"username": "b", "status": "online", "fatigueCount": u64::MAX, "fatigueDuration": u64::MAX}
            ]
        });
        let (status, body) = post(app(DisabledAdvisor), "/api/v1/reports/fleet", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overview"]["totalFatigueEvents"], u64::MAX);
        assert_eq!(body["overview"]["totalFatigueDuration"], u64::MAX);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(DisabledAdvisor)
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["components"]["advisor"], "disabled");
    }
}
