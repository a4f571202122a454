//! Live Traffic Monitor
//!
//! `hitwatch watch` follows an access log and prints a traffic report on a
//! fixed cadence: the busiest URL sections, hit/byte/bad-line totals, status
//! and method breakdowns, plus any high-traffic alerts raised or recovered
//! since the previous report.
//!
//! Three things run side by side:
//! - a tail worker reading new lines and feeding the aggregator,
//! - the alert evaluator, checking the trailing window once a second,
//! - the report task, snapshotting and printing.
//!
//! The data flow is:
//!
//! log file
//! LogTailer
//! LineProcessor
//! StatsAggregator
//! StatsSnapshot
//! render_report
//!

mod args;
mod constants;
mod render;
mod run;

#[cfg(test)]
mod tests;

pub use render::{ReportFormat, render_json, render_report};
pub use args::WatchArgs;
pub use run::{run, run_watch};
