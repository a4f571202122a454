use crate::cli::watch::render::{render_alert, render_json, render_report};
use crate::stats::{AlertTransition, StatsSnapshot, TransitionKind};
use std::collections::HashMap;

fn snapshot() -> StatsSnapshot {
    StatsSnapshot {
        top_sections: vec![("/api".to_string(), 7), ("/health".to_string(), 2)],
        section_count: 4,
        total_hits: 12,
        bad_lines: 1,
        response_bytes: 4_096,
        status_counts: HashMap::from([(200, 9), (404, 3)]),
        method_counts: HashMap::from([("GET".to_string(), 10), ("POST".to_string(), 2)]),
        alerts: vec![],
    }
}

#[test]
fn report_lists_counters_in_order() {
    // Arrange
    let snap = snapshot();

    // Act
    let out = render_report(&snap, 110, false);

    // Assert
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "SECTIONS WITH THE MOST HITS   : /api: 7, /health: 2");
    assert_eq!(lines[1], "Number of sections requested  : 4");
    assert_eq!(lines[2], "Total number of hits          : 12");
    assert_eq!(lines[3], "Total response bytes          : 4096");
    assert_eq!(lines[4], "Number of bad log lines       : 1");
    assert_eq!(lines[5], "Status code counts            : 200: 9, 404: 3");
    assert_eq!(lines[6], "Method counts                 : GET: 10, POST: 2");
    assert_eq!(lines.len(), 7);
}

#[test]
fn report_appends_alerts() {
    // Arrange
    let mut snap = snapshot();
    snap.alerts = vec![
        AlertTransition::new(TransitionKind::EnterHigh, 0),
        AlertTransition::new(TransitionKind::EnterLow, 60),
    ];

    // Act
    let out = render_report(&snap, 110, false);

    // Assert
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 9);
    assert!(lines[7].starts_with("High traffic generated an alert - hits >= 110, triggered at "));
    assert!(lines[8].starts_with("High traffic alert recovered at "));
}

#[test]
fn colored_output_wraps_text_in_escape_codes() {
    let alert = AlertTransition::new(TransitionKind::EnterHigh, 0);

    let plain = render_alert(&alert, 5, false);
    let colored = render_alert(&alert, 5, true);

    assert!(!plain.contains('\u{1b}'));
    assert!(colored.contains('\u{1b}'));
    assert!(colored.contains(&plain));
}

#[test]
fn json_report_is_machine_readable() {
    let mut snap = snapshot();
    snap.alerts = vec![AlertTransition::new(TransitionKind::EnterHigh, 42)];

    let json = render_json(&snap).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["total_hits"], 12);
    assert_eq!(value["top_sections"][0][0], "/api");
    assert_eq!(value["alerts"][0]["kind"], "EnterHigh");
    assert_eq!(value["alerts"][0]["at"], 42);
}
