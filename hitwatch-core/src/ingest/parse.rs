use crate::ingest::types::LogRecord;
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

// host ident user [time] "METHOD target PROTOCOL" status bytes
static REQUEST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<host>\S+) (?P<ident>\S+) (?P<user>\S+) \[(?P<time>[^\]]+)\] "(?P<method>\S+) (?P<path>\S+) (?P<proto>\S+)" (?P<status>\d{3}) (?P<bytes>\S+)$"#,
    )
    .expect("request line pattern is valid")
});

// host ident user [time] "-" status bytes
static EMPTY_REQUEST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<host>\S+) (?P<ident>\S+) (?P<user>\S+) \[(?P<time>[^\]]+)\] "-" (?P<status>\d{3}) (?P<bytes>\S+)$"#,
    )
    .expect("empty request line pattern is valid")
});

/// Parses one Common Log Format line.
///
/// Returns `None` when the line matches neither accepted shape or carries an
/// unreadable timestamp or status.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let line = line.trim();

    if let Some(caps) = REQUEST_LINE.captures(line) {
        return record_from(&caps, true);
    }

    EMPTY_REQUEST_LINE
        .captures(line)
        .and_then(|caps| record_from(&caps, false))
}

fn record_from(caps: &Captures<'_>, has_request: bool) -> Option<LogRecord> {
    let timestamp = DateTime::parse_from_str(&caps["time"], TIME_FORMAT)
        .ok()?
        .timestamp();
    let status = caps["status"].parse::<u16>().ok()?;

    let (method, path) = if has_request {
        (
            Some(caps["method"].to_string()),
            Some(caps["path"].to_string()),
        )
    } else {
        (None, None)
    };

    Some(LogRecord {
        timestamp,
        method,
        path,
        status,
        bytes: Some(caps["bytes"].to_string()),
    })
}
