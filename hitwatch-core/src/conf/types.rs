use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ALERT_THRESHOLD: usize = 110;
pub const DEFAULT_ALERT_WINDOW_SECS: u64 = 2 * 60;
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_TOP_SECTIONS: usize = 3;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// Upper bounds accepted by validation.
pub const MAX_ALERT_THRESHOLD: usize = 10_000_000;
pub const MAX_ALERT_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;
pub const MAX_REPORT_INTERVAL_SECS: u64 = 24 * 60 * 60;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Resolved hitwatch configuration.
///
/// Every field has a default so an empty (or absent) config file is valid
/// once a log file is supplied on the command line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HitwatchConfig {
    /// Access log to monitor; `-` reads stdin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    pub alert: AlertConfig,
    pub report: ReportConfig,
    pub tail: TailConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Hits within the window that raise the high-traffic alert.
    pub threshold: usize,
    pub window_secs: u64,
    /// Stamp events with the ingestion time instead of the logged request time.
    /// Useful when replaying old logs.
    pub use_current_timestamps: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ALERT_THRESHOLD,
            window_secs: DEFAULT_ALERT_WINDOW_SECS,
            use_current_timestamps: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub interval_secs: u64,
    pub top_sections: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REPORT_INTERVAL_SECS,
            top_sections: DEFAULT_TOP_SECTIONS,
        }
    }
}

impl ReportConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TailConfig {
    pub poll_interval_ms: u64,
    /// Process lines already in the file before following it.
    pub from_start: bool,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            from_start: false,
        }
    }
}

impl TailConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_file: Option<PathBuf>,
    pub threshold: Option<usize>,
    pub window_secs: Option<u64>,
    pub use_current_timestamps: bool,
    pub interval_secs: Option<u64>,
    pub top_sections: Option<usize>,
    pub from_start: bool,
}

impl ConfigOverrides {
    pub fn apply(self, mut cfg: HitwatchConfig) -> HitwatchConfig {
        if let Some(path) = self.log_file {
            cfg.log_file = Some(path);
        }
        if let Some(threshold) = self.threshold {
            cfg.alert.threshold = threshold;
        }
        if let Some(window_secs) = self.window_secs {
            cfg.alert.window_secs = window_secs;
        }
        if let Some(interval_secs) = self.interval_secs {
            cfg.report.interval_secs = interval_secs;
        }
        if let Some(top) = self.top_sections {
            cfg.report.top_sections = top;
        }
        // Flags can only switch these on.
        cfg.alert.use_current_timestamps |= self.use_current_timestamps;
        cfg.tail.from_start |= self.from_start;
        cfg
    }
}
