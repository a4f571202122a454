use crate::cli::watch::constants::ALERT_TIME_FORMAT;
use crate::stats::{AlertTransition, StatsSnapshot, TransitionKind, ranked};
use chrono::{DateTime, Local};
use owo_colors::{AnsiColors, OwoColorize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReportFormat {
    /// Aligned text; colored when `color` is set.
    Pretty { color: bool },
    /// One JSON object per report.
    Json,
}

pub fn render_report(snapshot: &StatsSnapshot, threshold: usize, color: bool) -> String {
    let mut out = String::new();

    let sections = counts_line(snapshot.top_sections.iter().map(|(s, c)| (s, *c)));
    out.push_str(&paint(
        format!("SECTIONS WITH THE MOST HITS   : {sections}"),
        AnsiColors::Green,
        color,
    ));
    out.push('\n');

    out.push_str(&format!(
        "Number of sections requested  : {}\n\
         Total number of hits          : {}\n\
         Total response bytes          : {}\n\
         Number of bad log lines       : {}\n",
        snapshot.section_count, snapshot.total_hits, snapshot.response_bytes, snapshot.bad_lines
    ));

    let statuses = counts_line(ranked(
        snapshot.status_counts.iter().map(|(s, c)| (*s, *c)),
    ));
    let methods = counts_line(ranked(
        snapshot.method_counts.iter().map(|(m, c)| (m.as_str(), *c)),
    ));
    out.push_str(&format!("Status code counts            : {statuses}\n"));
    out.push_str(&format!("Method counts                 : {methods}\n"));

    for alert in &snapshot.alerts {
        out.push_str(&render_alert(alert, threshold, color));
        out.push('\n');
    }

    out
}

pub fn render_alert(alert: &AlertTransition, threshold: usize, color: bool) -> String {
    let at = format_time(alert.at);

    match alert.kind {
        TransitionKind::EnterHigh => paint(
            format!("High traffic generated an alert - hits >= {threshold}, triggered at {at}"),
            AnsiColors::Red,
            color,
        ),
        TransitionKind::EnterLow => paint(
            format!("High traffic alert recovered at {at}"),
            AnsiColors::Magenta,
            color,
        ),
    }
}

pub fn render_json(snapshot: &StatsSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

fn counts_line<K: Display>(pairs: impl IntoIterator<Item = (K, u64)>) -> String {
    pairs
        .into_iter()
        .map(|(k, c)| format!("{k}: {c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_time(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|t| t.with_timezone(&Local).format(ALERT_TIME_FORMAT).to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn paint(text: String, ansi: AnsiColors, enabled: bool) -> String {
    if enabled {
        text.color(ansi).bold().to_string()
    } else {
        text
    }
}
