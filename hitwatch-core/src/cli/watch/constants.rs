pub const ALERT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const REPORT_SEPARATOR: &str = "------------------------------------------------------------";
