use crate::conf::error::{ConfigError, ValidationIssue};
use crate::conf::types::{
    HitwatchConfig, MAX_ALERT_THRESHOLD, MAX_ALERT_WINDOW_SECS, MAX_POLL_INTERVAL_MS,
    MAX_REPORT_INTERVAL_SECS,
};
use std::fmt::Display;

/// Checks a resolved config.
///
/// A missing log file is reported on its own. Every other problem is
/// collected and reported together.
pub fn validate_config(cfg: &HitwatchConfig) -> Result<(), ConfigError> {
    if cfg.log_file.is_none() {
        return Err(ConfigError::MissingLogFile);
    }

    let mut issues = Vec::new();

    if cfg.alert.threshold == 0 {
        issues.push(issue("alert.threshold", "must be at least 1"));
    } else if cfg.alert.threshold > MAX_ALERT_THRESHOLD {
        issues.push(at_most("alert.threshold", MAX_ALERT_THRESHOLD));
    }

    if cfg.alert.window_secs == 0 {
        issues.push(issue("alert.window_secs", "must be at least 1 second"));
    } else if cfg.alert.window_secs > MAX_ALERT_WINDOW_SECS {
        issues.push(at_most("alert.window_secs", MAX_ALERT_WINDOW_SECS));
    }

    if cfg.report.interval_secs == 0 {
        issues.push(issue("report.interval_secs", "must be at least 1 second"));
    } else if cfg.report.interval_secs > MAX_REPORT_INTERVAL_SECS {
        issues.push(at_most("report.interval_secs", MAX_REPORT_INTERVAL_SECS));
    }

    if cfg.report.top_sections == 0 {
        issues.push(issue("report.top_sections", "must be at least 1"));
    }

    if cfg.tail.poll_interval_ms == 0 {
        issues.push(issue("tail.poll_interval_ms", "must be at least 1 millisecond"));
    } else if cfg.tail.poll_interval_ms > MAX_POLL_INTERVAL_MS {
        issues.push(at_most("tail.poll_interval_ms", MAX_POLL_INTERVAL_MS));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { issues })
    }
}

fn issue(field: &'static str, message: &str) -> ValidationIssue {
    ValidationIssue {
        field,
        message: message.to_string(),
    }
}

fn at_most(field: &'static str, max: impl Display) -> ValidationIssue {
    ValidationIssue {
        field,
        message: format!("must be at most {max}"),
    }
}
