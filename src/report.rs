/// Rendering of a `ClassificationReport` for people and for machines.
///
/// Text layout:
///
/// ```text
/// Merzig (49.4431, 6.6383) needs Intermediate Skills at 2024-06-18 01:00:00 UTC
/// ...
///
/// FLOOD BY RAIN
/// Merzig (49.4431, 6.6383)
///
/// FLOOD BY RIVER
/// Saarlouis (49.3164, 6.749) near Saar
/// ```

use chrono::DateTime;

use crate::analysis::classifier::{ClassificationReport, RiverFlood, SkillAdvisory};

/// `YYYY-MM-DD HH:MM:SS` in UTC, or the raw number if out of range.
pub fn format_timestamp(unix_seconds: i64) -> String {
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => unix_seconds.to_string(),
    }
}

pub fn format_advisory(advisory: &SkillAdvisory) -> String {
    format!(
        "{} needs {} at {} UTC",
        advisory.location,
        advisory.skill,
        format_timestamp(advisory.observed_at)
    )
}

pub fn format_river_flood(flood: &RiverFlood) -> String {
    format!("{} near {}", flood.location, flood.river)
}

/// Plain-text report: advisories, then the two flood sections.
pub fn render_text(report: &ClassificationReport) -> String {
    let mut lines: Vec<String> = report.advisories.iter().map(format_advisory).collect();

    lines.push(String::new());
    lines.push("FLOOD BY RAIN".to_string());
    lines.extend(report.rain_flooded.iter().map(|location| location.to_string()));

    lines.push(String::new());
    lines.push("FLOOD BY RIVER".to_string());
    lines.extend(report.river_flooded.iter().map(format_river_flood));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Pretty-printed JSON of the whole report, rolling windows included.
pub fn render_json(report: &ClassificationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
