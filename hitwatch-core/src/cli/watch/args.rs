use crate::cli::watch::render::ReportFormat;
use crate::conf::ConfigOverrides;
use clap::Args;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Path to an HCL config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Access log to follow; `-` reads stdin
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Hits within the alert window that raise the high-traffic alert
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Length of the alert window in seconds
    #[arg(long)]
    pub window_secs: Option<u64>,

    /// Use the current time instead of the logged request time for alerting
    #[arg(long)]
    pub use_current_timestamps: bool,

    /// Seconds between reports
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Number of sections to rank in each report
    #[arg(long)]
    pub top: Option<usize>,

    /// Process lines already in the file before following it
    #[arg(long)]
    pub from_start: bool,

    /// Print reports as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl WatchArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_file: self.log_file.clone(),
            threshold: self.threshold,
            window_secs: self.window_secs,
            use_current_timestamps: self.use_current_timestamps,
            interval_secs: self.interval_secs,
            top_sections: self.top,
            from_start: self.from_start,
        }
    }

    pub fn format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Pretty {
                color: io::stdout().is_terminal(),
            }
        }
    }
}
