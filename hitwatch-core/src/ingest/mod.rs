//! Access-log ingestion.
//!
//! A [`LogTailer`] (or [`follow_reader`] for stdin) watches the source and
//! hands newly appended lines to a [`LineSink`]. [`LineProcessor`] is the sink
//! that decodes each line with [`parse_line`] and feeds the aggregator.

mod parse;
mod tail;
mod types;

#[cfg(test)]
mod tests;

pub use parse::parse_line;
pub use tail::{LogTailer, TailError, TailOptions, follow_reader};
pub use types::LogRecord;

use crate::stats::StatsAggregator;
use std::sync::Arc;

/// Receives complete log lines, in file order, each exactly once.
pub trait LineSink {
    fn on_new_lines(&self, lines: &[String]);
}

pub struct LineProcessor {
    aggregator: Arc<StatsAggregator>,
}

impl LineProcessor {
    pub fn new(aggregator: Arc<StatsAggregator>) -> Self {
        Self { aggregator }
    }
}

impl LineSink for LineProcessor {
    fn on_new_lines(&self, lines: &[String]) {
        for line in lines {
            match parse_line(line) {
                Some(record) => self.aggregator.ingest(&record),
                None => {
                    tracing::debug!(line = %line, "unparsable log line");
                    self.aggregator.on_unparsable_line();
                }
            }
        }
    }
}
