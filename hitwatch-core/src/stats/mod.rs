//! Traffic statistics engine.
//!
//! Decoded records flow into [`StatsAggregator`], which keeps running counters,
//! ranks URL sections in a [`TopKTracker`] and feeds request times to a
//! [`WindowAlerter`]. A separate evaluator task flips the alerter between
//! `Low` and `High`; [`StatsAggregator::snapshot`] hands both halves to the
//! report loop.
//!
//! LogRecord
//! StatsAggregator -> TopKTracker, WindowAlerter
//! StatsSnapshot
//! render_report
//!

pub mod aggregator;
pub mod alerter;
pub mod evaluator;
pub mod section;
pub mod snapshot;
pub mod top_k;

#[cfg(test)]
mod tests;

pub use aggregator::*;
pub use alerter::*;
pub use evaluator::*;
pub use section::section_of;
pub use snapshot::*;
pub use top_k::*;
