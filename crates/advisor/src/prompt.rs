//! Prompt construction

use std::fmt::Write;

use fatigue_analysis::{FatigueAnalysis, FleetAnalysis, TimeBand, UserIdentity};

const FLEET_TOP_USERS: usize = 5;

/// Prompt for a single driver's recommendations
pub fn personal_prompt(analysis: &FatigueAnalysis, user: &UserIdentity) -> String {
    let stats = &analysis.stats;
    let time = &analysis.time_distribution;

    let bands = TimeBand::ALL
        .iter()
        .map(|band| {
            format!(
                "{} {} ({}%)",
                band.label(),
                time.distribution.get(*band),
                time.percentages.get(*band)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let types = if analysis.type_stats.is_empty() {
        "none".to_string()
    } else {
        analysis
            .type_stats
            .iter()
            .map(|(kind, summary)| format!("{} {}", kind, summary.count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Personal fatigue advice. Based on the monitoring data below, give advice for this driver."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Driver: {}, status: {}",
        user.username,
        user.status_label()
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Fatigue data:");
    let _ = writeln!(prompt, "- Total fatigue events: {}", stats.total_events);
    let _ = writeln!(
        prompt,
        "- High severity: {}, medium severity: {}, low severity: {}",
        stats.high_severity_events, stats.medium_severity_events, stats.low_severity_events
    );
    let _ = writeln!(
        prompt,
        "- Average duration: {}s, longest duration: {}s",
        stats.avg_duration, stats.max_duration
    );
    let _ = writeln!(prompt, "- Risk level: {}", analysis.risk.overall_risk.label());
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Time of day: {}", bands);
    let _ = writeln!(prompt, "Fatigue types: {}", types);
    let _ = writeln!(prompt);
    let _ = write!(
        prompt,
        "Give 5-8 personal recommendations as a numbered list, without analysis."
    );
    prompt
}

/// Prompt for fleet management recommendations
pub fn fleet_prompt(fleet: &FleetAnalysis) -> String {
    let overview = &fleet.overview;
    let risk = &fleet.risk_distribution;

    let top = fleet
        .by_fatigue_count
        .iter()
        .take(FLEET_TOP_USERS)
        .map(|assessed| format!("{} ({})", assessed.user.username, assessed.user.fatigue_count))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Fleet management advice. Based on the fleet-wide monitoring data below, advise a manager on handling fatigued drivers."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Fleet data:");
    let _ = writeln!(
        prompt,
        "- Drivers: {} ({} online, {} offline)",
        overview.total_users, overview.online_users, overview.offline_users
    );
    let _ = writeln!(
        prompt,
        "- Total fatigue events: {}, total fatigue duration: {}s",
        overview.total_fatigue_events, overview.total_fatigue_duration
    );
    let _ = writeln!(
        prompt,
        "- Per driver: {} events, {}s",
        overview.avg_fatigue_per_user, overview.avg_duration_per_user
    );
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Risk distribution: {} high, {} medium, {} low",
        risk.high, risk.medium, risk.low
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Most fatigue events: {}", if top.is_empty() { "none" } else { top.as_str() });
    let _ = writeln!(prompt);
    let _ = write!(
        prompt,
        "Give 6-10 management recommendations as a numbered list, without analysis."
    );
    prompt
}
