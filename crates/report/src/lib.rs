//! Fatigue Report Assembly
//!
//! Builds driver and fleet reports from raw monitoring records:
//! - Boundary validation of raw events
//! - Analysis through the fatigue engine
//! - Recommendations tagged by provenance, AI first with a rule-based floor
//! - Layouts for spreadsheet and document sinks

mod error;
mod fleet;
mod generator;
mod model;
mod recommend;
mod render;

pub use error::ReportError;
pub use fleet::{
    FleetReport, FleetStatistics, FleetUserRow, RiskShares, Share, StatusShares, LEADERBOARD_TOP,
    OVERVIEW_TOP,
};
pub use generator::{ReportConfig, ReportGenerator};
pub use model::{
    DetailEventRow, FatigueReport, ReportOverview, ReportStatistics, SeverityRow, TimeBandRow,
    TrendSection, TypeRow,
};
pub use recommend::{
    merge_recommendations, recommend, request_advice, Recommendation, RecommendationSet,
    RecommendationSource,
};
pub use render::{Cell, Document, DocumentLayout, ReportLayout, Section, Sheet, Workbook, WorkbookLayout};
