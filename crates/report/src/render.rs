//! Output layouts over the report model
//!
//! Layouts only arrange values the report already holds; they never compute
//! figures of their own. File encoders consume the layout output.

use serde::Serialize;

use crate::fleet::{FleetReport, FleetUserRow};
use crate::model::FatigueReport;

/// Arranges reports for a particular kind of sink
pub trait ReportLayout {
    type Output: Serialize;

    fn driver(&self, report: &FatigueReport) -> Self::Output;

    fn fleet(&self, report: &FleetReport) -> Self::Output;
}

const NO_RISK_FACTORS: &str = "No significant risk factors";
const NO_HIGH_RISK: &str = "No high-risk drivers";

/// A spreadsheet cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(u64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Number(n)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Number(n as u64)
    }
}

macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$(Cell::from($cell)),*]
    };
}

/// A named worksheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    pub column_widths: Vec<u16>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str, column_widths: &[u16]) -> Self {
        Self {
            name: name.to_string(),
            column_widths: column_widths.to_vec(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Five-sheet spreadsheet layout
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookLayout;

impl WorkbookLayout {
    fn recommendation_rows(sheet: &mut Sheet, recs: &[crate::Recommendation]) {
        sheet.push(row!["No.", "Recommendation", "Source"]);
        for (i, rec) in recs.iter().enumerate() {
            sheet.push(row![i + 1, rec.content.as_str(), rec.source.label()]);
        }
    }

    fn driver_overview(report: &FatigueReport) -> Sheet {
        let o = &report.overview;
        let s = &o.stats;
        let mut sheet = Sheet::new("Overview", &[20, 40]);
        sheet.push(row!["Driver Fatigue Monitoring Report"]);
        sheet.blank();
        sheet.push(row!["Generated at", o.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()]);
        sheet.push(row!["Report ID", o.report_id.to_string()]);
        sheet.push(row!["Driver", o.user.username.as_str()]);
        sheet.push(row!["Phone", o.user.phone_label()]);
        sheet.push(row!["Status", o.user.status_label()]);
        sheet.blank();
        sheet.push(row!["Overall Assessment"]);
        sheet.push(row!["Risk tier", o.overall_risk.label()]);
        sheet.push(row!["Risk level", format!("{}/5", o.risk_level)]);
        sheet.blank();
        sheet.push(row!["Statistics"]);
        sheet.push(row!["Total events", s.total_events]);
        sheet.push(row!["High severity", s.high_severity_events]);
        sheet.push(row!["Medium severity", s.medium_severity_events]);
        sheet.push(row!["Low severity", s.low_severity_events]);
        sheet.push(row!["Average duration (s)", s.avg_duration]);
        sheet.push(row!["Longest duration (s)", s.max_duration]);
        sheet.push(row!["Total duration (s)", s.total_duration]);
        sheet.blank();
        sheet.push(row!["Trend"]);
        sheet.push(row!["", o.trend_analysis.as_str()]);
        sheet.blank();
        sheet.push(row!["Fatigue Types"]);
        sheet.push(row!["", o.type_analysis.as_str()]);
        sheet
    }

    fn driver_details(report: &FatigueReport) -> Sheet {
        let mut sheet = Sheet::new("Event Details", &[8, 20, 12, 15, 12, 30]);
        sheet.push(row!["No.", "Time", "Type", "Duration (s)", "Severity", "Location"]);
        for e in &report.detail_events {
            sheet.push(row![
                e.index,
                e.time.as_str(),
                e.kind.as_str(),
                e.duration,
                e.severity.label(),
                e.location.as_str(),
            ]);
        }
        sheet
    }

    fn driver_statistics(report: &FatigueReport) -> Sheet {
        let stats = &report.statistics;
        let mut sheet = Sheet::new("Statistics", &[15, 12, 10, 18, 18]);
        sheet.push(row!["Fatigue Event Statistics"]);
        sheet.blank();
        sheet.push(row!["By Type"]);
        sheet.push(row!["Type", "Count", "Share (%)", "Avg duration (s)", "Max duration (s)"]);
        for t in &stats.by_type {
            sheet.push(row![t.kind.as_str(), t.count, t.percentage, t.avg_duration, t.max_duration]);
        }
        sheet.blank();
        sheet.push(row!["By Severity"]);
        sheet.push(row!["Severity", "Count", "Share (%)"]);
        for s in &stats.by_severity {
            sheet.push(row![s.severity.label(), s.count, s.percentage]);
        }
        sheet.blank();
        sheet.push(row!["By Time of Day"]);
        sheet.push(row!["Time band", "Count", "Share (%)"]);
        for b in &stats.by_time_band {
            sheet.push(row![b.band.label(), b.count, b.percentage]);
        }
        sheet
    }

    fn driver_trend(report: &FatigueReport) -> Sheet {
        let mut sheet = Sheet::new("Trend Analysis", &[12, 12, 18, 18, 15, 12]);
        sheet.push(row!["Fatigue Event Trend"]);
        sheet.blank();
        sheet.push(row!["Recent Days"]);
        sheet.push(row![
            "Date",
            "Events",
            "Total duration (s)",
            "Avg duration (s)",
            "High severity",
            "Risk",
        ]);
        for point in &report.trend.days {
            let day = &point.day;
            sheet.push(row![
                day.date.to_string(),
                day.count,
                day.duration,
                day.avg_duration,
                day.high_severity_count,
                point.risk_level.label(),
            ]);
        }
        sheet.blank();
        sheet.push(row!["Risk Factors"]);
        if report.trend.risk_factors.is_empty() {
            sheet.push(row!["", NO_RISK_FACTORS]);
        } else {
            for (i, factor) in report.trend.risk_factors.iter().enumerate() {
                sheet.push(row![format!("Factor {}", i + 1), factor.as_str()]);
            }
        }
        sheet
    }

    fn user_row(u: &FleetUserRow) -> Vec<Cell> {
        row![
            u.rank,
            u.username.as_str(),
            u.phone.as_str(),
            u.fatigue_count,
            u.fatigue_duration,
        ]
    }
}

impl ReportLayout for WorkbookLayout {
    type Output = Workbook;

    fn driver(&self, report: &FatigueReport) -> Workbook {
        let mut recommendations = Sheet::new("Recommendations", &[8, 70, 15]);
        recommendations.push(row!["Recommendations"]);
        recommendations.blank();
        Self::recommendation_rows(&mut recommendations, &report.recommendations);

        Workbook {
            sheets: vec![
                Self::driver_overview(report),
                Self::driver_details(report),
                Self::driver_statistics(report),
                Self::driver_trend(report),
                recommendations,
            ],
        }
    }

    fn fleet(&self, report: &FleetReport) -> Workbook {
        let o = &report.overview;
        let r = &report.risk_distribution;

        let mut overview = Sheet::new("Overview", &[8, 20, 15, 12, 15, 10]);
        overview.push(row!["Fleet Fatigue Monitoring Report"]);
        overview.blank();
        overview.push(row!["Generated at", report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()]);
        overview.push(row!["Scope", "All drivers"]);
        overview.blank();
        overview.push(row!["Fleet Statistics"]);
        overview.push(row!["Drivers", o.total_users]);
        overview.push(row!["Online", o.online_users]);
        overview.push(row!["Offline", o.offline_users]);
        overview.push(row!["Fatigue events", o.total_fatigue_events]);
        overview.push(row!["Fatigue duration (s)", o.total_fatigue_duration]);
        overview.push(row!["Events per driver", o.avg_fatigue_per_user]);
        overview.push(row!["Duration per driver (s)", o.avg_duration_per_user]);
        overview.blank();
        overview.push(row!["Risk Distribution"]);
        overview.push(row!["High risk", r.high]);
        overview.push(row!["Medium risk", r.medium]);
        overview.push(row!["Low risk", r.low]);
        overview.blank();
        overview.push(row!["Most Fatigue Events"]);
        overview.push(row!["Rank", "Driver", "Phone", "Events", "Duration (s)", "Status"]);
        for u in &report.top_by_count {
            let mut cells = Self::user_row(u);
            cells.push(Cell::from(u.status.as_str()));
            overview.push(cells);
        }

        let mut summary = Sheet::new("Driver Summary", &[8, 15, 15, 10, 12, 15, 12]);
        summary.push(row!["No.", "Driver", "Phone", "Status", "Events", "Duration (s)", "Risk"]);
        for u in &report.users {
            summary.push(row![
                u.rank,
                u.username.as_str(),
                u.phone.as_str(),
                u.status.as_str(),
                u.fatigue_count,
                u.fatigue_duration,
                u.risk_level.label(),
            ]);
        }

        let s = &report.statistics;
        let mut statistics = Sheet::new("Statistics", &[20, 12, 12]);
        statistics.push(row!["Statistics"]);
        statistics.blank();
        statistics.push(row!["By Status"]);
        statistics.push(row!["Status", "Drivers", "Share (%)"]);
        statistics.push(row!["Online", s.by_status.online.count, s.by_status.online.percentage]);
        statistics.push(row!["Offline", s.by_status.offline.count, s.by_status.offline.percentage]);
        statistics.blank();
        statistics.push(row!["By Risk"]);
        statistics.push(row!["Risk", "Drivers", "Share (%)"]);
        statistics.push(row!["High", s.by_risk.high.count, s.by_risk.high.percentage]);
        statistics.push(row!["Medium", s.by_risk.medium.count, s.by_risk.medium.percentage]);
        statistics.push(row!["Low", s.by_risk.low.count, s.by_risk.low.percentage]);
        statistics.blank();
        statistics.push(row!["Fatigue Event Count"]);
        statistics.push(row!["Range", "Drivers"]);
        statistics.push(row!["0", s.count_buckets.none]);
        statistics.push(row!["1-2", s.count_buckets.one_to_two]);
        statistics.push(row!["3-4", s.count_buckets.three_to_four]);
        statistics.push(row!["5+", s.count_buckets.five_or_more]);
        statistics.blank();
        statistics.push(row!["Fatigue Duration"]);
        statistics.push(row!["Range", "Drivers"]);
        statistics.push(row!["0-20s", s.duration_buckets.up_to_20]);
        statistics.push(row!["21-60s", s.duration_buckets.from_21_to_60]);
        statistics.push(row!["61-120s", s.duration_buckets.from_61_to_120]);
        statistics.push(row!["Over 120s", s.duration_buckets.over_120]);

        let mut rankings = Sheet::new("Rankings", &[8, 15, 15, 12, 15]);
        rankings.push(row!["Fatigue Event Leaderboard"]);
        rankings.blank();
        rankings.push(row!["Rank", "Driver", "Phone", "Events", "Duration (s)"]);
        for u in &report.leaderboard {
            rankings.push(Self::user_row(u));
        }

        let mut risk = Sheet::new("Risk Analysis", &[8, 15, 15, 12, 30]);
        risk.push(row!["Risk Analysis and Recommendations"]);
        risk.blank();
        risk.push(row!["High-Risk Drivers"]);
        risk.push(row!["Driver", "Phone", "Events", "Duration (s)", "Risk factors"]);
        if report.high_risk.is_empty() {
            risk.push(row![NO_HIGH_RISK]);
        } else {
            for u in &report.high_risk {
                risk.push(row![
                    u.username.as_str(),
                    u.phone.as_str(),
                    u.fatigue_count,
                    u.fatigue_duration,
                    u.risk_factors.join(", "),
                ]);
            }
        }
        risk.blank();
        risk.push(row!["Management Recommendations"]);
        Self::recommendation_rows(&mut risk, &report.recommendations);

        Workbook {
            sheets: vec![overview, summary, statistics, rankings, risk],
        }
    }
}

/// A headed block of paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

impl Section {
    fn new(heading: &str, paragraphs: Vec<String>) -> Self {
        Self {
            heading: heading.to_string(),
            paragraphs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

/// Prose layout for word-processor and PDF sinks
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLayout;

impl ReportLayout for DocumentLayout {
    type Output = Document;

    fn driver(&self, report: &FatigueReport) -> Document {
        let o = &report.overview;
        let s = &o.stats;

        let basics = vec![
            format!("Driver: {}", o.user.username),
            format!("Phone: {}", o.user.phone_label()),
            format!("Status: {}", o.user.status_label()),
            format!("Generated at: {}", o.generated_at.format("%Y-%m-%d %H:%M:%S")),
        ];

        let assessment = vec![
            format!("Risk tier: {} (level {}/5)", o.overall_risk.label(), o.risk_level),
            format!(
                "{} fatigue events: {} high, {} medium, {} low severity.",
                s.total_events, s.high_severity_events, s.medium_severity_events, s.low_severity_events
            ),
            format!(
                "Average duration {}s, longest {}s, total {}s.",
                s.avg_duration, s.max_duration, s.total_duration
            ),
            o.trend_analysis.clone(),
            o.type_analysis.clone(),
        ];

        let mut breakdown: Vec<String> = report
            .statistics
            .by_type
            .iter()
            .map(|t| format!("{}: {} events ({}%), avg {}s", t.kind, t.count, t.percentage, t.avg_duration))
            .collect();
        breakdown.extend(
            report
                .statistics
                .by_time_band
                .iter()
                .map(|b| format!("{}: {} events ({}%)", b.band.label(), b.count, b.percentage)),
        );

        let mut trend: Vec<String> = report
            .trend
            .days
            .iter()
            .map(|p| {
                format!(
                    "{}: {} events, {}s total, {} high severity, {} risk",
                    p.day.date,
                    p.day.count,
                    p.day.duration,
                    p.day.high_severity_count,
                    p.risk_level.label()
                )
            })
            .collect();
        if report.trend.risk_factors.is_empty() {
            trend.push(NO_RISK_FACTORS.to_string());
        } else {
            trend.extend(report.trend.risk_factors.iter().cloned());
        }

        Document {
            title: "Driver Fatigue Monitoring Report".to_string(),
            sections: vec![
                Section::new("Driver", basics),
                Section::new("Assessment", assessment),
                Section::new("Breakdown", breakdown),
                Section::new("Trend", trend),
                Section::new("Recommendations", numbered(&report.recommendations)),
            ],
        }
    }

    fn fleet(&self, report: &FleetReport) -> Document {
        let o = &report.overview;
        let r = &report.risk_distribution;

        let overview = vec![
            format!("Generated at: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S")),
            format!("{} drivers ({} online, {} offline).", o.total_users, o.online_users, o.offline_users),
            format!(
                "{} fatigue events totalling {}s; {} events and {}s per driver.",
                o.total_fatigue_events, o.total_fatigue_duration, o.avg_fatigue_per_user, o.avg_duration_per_user
            ),
            format!("Risk: {} high, {} medium, {} low.", r.high, r.medium, r.low),
        ];

        let ranking = report
            .top_by_count
            .iter()
            .map(|u| format!("{}. {}: {} events, {}s", u.rank, u.username, u.fatigue_count, u.fatigue_duration))
            .collect();

        let roster = if report.high_risk.is_empty() {
            vec![NO_HIGH_RISK.to_string()]
        } else {
            report
                .high_risk
                .iter()
                .map(|u| format!("{} ({}): {}", u.username, u.phone, u.risk_factors.join(", ")))
                .collect()
        };

        Document {
            title: "Fleet Fatigue Monitoring Report".to_string(),
            sections: vec![
                Section::new("Overview", overview),
                Section::new("Most Fatigue Events", ranking),
                Section::new("High-Risk Drivers", roster),
                Section::new("Management Recommendations", numbered(&report.recommendations)),
            ],
        }
    }
}

fn numbered(recs: &[crate::Recommendation]) -> Vec<String> {
    recs.iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} [{}]", i + 1, r.content, r.source.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportGenerator;
    use advisor::DisabledAdvisor;
    use data_validator::{RawFatigueEvent, RawUserRecord};
    use fatigue_analysis::{FleetUserSummary, UserIdentity};

    async fn driver_report() -> FatigueReport {
        let record = RawUserRecord {
            user: UserIdentity::new("li.wei"),
            events: vec![
                RawFatigueEvent::new("2024-01-15 09:00:00", 35).with_kind("yawn"),
                RawFatigueEvent::new("2024-01-16 23:00:00", 10).with_kind("blink"),
            ],
        };
        ReportGenerator::new(DisabledAdvisor).generate(&record).await.unwrap()
    }

    #[tokio::test]
    async fn test_driver_workbook() {
        let report = driver_report().await;
        let workbook = WorkbookLayout.driver(&report);

        let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Overview", "Event Details", "Statistics", "Trend Analysis", "Recommendations"]
        );

        let details = workbook.sheet("Event Details").unwrap();
        assert_eq!(details.rows.len(), 3);
        assert_eq!(details.column_widths.len(), details.rows[0].len());
        assert_eq!(details.rows[1][4], Cell::from("High"));

        let recs = workbook.sheet("Recommendations").unwrap();
        assert_eq!(recs.rows.len(), 3 + report.recommendations.len());
        assert_eq!(recs.rows[3][2], Cell::from("rule-based"));
    }

    #[tokio::test]
    async fn test_driver_document() {
        let report = driver_report().await;
        let doc = DocumentLayout.driver(&report);
        assert_eq!(doc.sections.len(), 5);
        assert_eq!(doc.sections[0].paragraphs[0], "Driver: li.wei");
        assert!(doc.sections[4].paragraphs[0].starts_with("1. "));
        assert!(doc.sections[4].paragraphs[0].ends_with("[rule-based]"));
    }

    #[tokio::test]
    async fn test_fleet_layouts() {
        let users = vec![FleetUserSummary {
            username: "wang.fang".to_string(),
            status: Some("online".to_string()),
            fatigue_count: 1,
            fatigue_duration: 5,
            ..Default::default()
        }];
        let report = ReportGenerator::new(DisabledAdvisor).generate_fleet(&users).await;

        let workbook = WorkbookLayout.fleet(&report);
        assert_eq!(workbook.sheets.len(), 5);
        let risk = workbook.sheet("Risk Analysis").unwrap();
        assert_eq!(risk.rows[4], vec![Cell::from(NO_HIGH_RISK)]);

        let doc = DocumentLayout.fleet(&report);
        assert_eq!(doc.sections[2].paragraphs, vec![NO_HIGH_RISK.to_string()]);
        assert_eq!(doc.sections[3].paragraphs.len(), 8);
    }

    #[test]
    fn test_cells_serialize_untagged() {
        let json = serde_json::to_string(&row!["a", 3u64]).unwrap();
        assert_eq!(json, r#"["a",3]"#);
    }
}
