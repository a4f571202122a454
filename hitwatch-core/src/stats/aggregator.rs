use crate::ingest::LogRecord;
use crate::stats::alerter::WindowAlerter;
use crate::stats::section::section_of;
use crate::stats::snapshot::{StatsSnapshot, ranked};
use crate::stats::top_k::TopKTracker;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Which clock stamps the events fed to the alerter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TimestampSource {
    /// The request time written in the log line.
    #[default]
    Record,
    /// Wall-clock time when the line is ingested.
    Ingestion,
}

#[derive(Debug, Clone)]
pub struct AlertParams {
    pub threshold: usize,
    pub window_secs: u64,
    pub timestamp_source: TimestampSource,
}

/// Running traffic statistics for one monitored log.
///
/// Counters and the section tracker share one lock. The alerter has its own,
/// and the two are never held at the same time.
pub struct StatsAggregator {
    inner: Mutex<Counters>,
    alerter: Arc<WindowAlerter>,
    timestamp_source: TimestampSource,
}

#[derive(Default)]
struct Counters {
    total_hits: u64,
    bad_lines: u64,
    response_bytes: u64,
    status_counts: HashMap<u16, u64>,
    method_counts: HashMap<String, u64>,
    sections: TopKTracker<String>,
}

impl StatsAggregator {
    pub fn new(params: AlertParams) -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
            alerter: Arc::new(WindowAlerter::new(params.threshold, params.window_secs)),
            timestamp_source: params.timestamp_source,
        }
    }

    /// Shared handle for the evaluator task.
    pub fn alerter(&self) -> Arc<WindowAlerter> {
        self.alerter.clone()
    }

    pub fn ingest(&self, record: &LogRecord) {
        let ts = match self.timestamp_source {
            TimestampSource::Record => record.timestamp,
            TimestampSource::Ingestion => chrono::Utc::now().timestamp(),
        };
        // Alerter lock is taken and released before ours.
        self.alerter.add_event(ts);

        let section = record.path.as_deref().map(section_of);
        let bytes = record.bytes.as_deref().and_then(|b| b.parse::<u64>().ok());

        let mut inner = self.lock();

        if let Some(section) = section {
            inner.sections.increment(section.to_string(), 1);
        }

        inner.total_hits += 1;
        *inner.status_counts.entry(record.status).or_insert(0) += 1;

        if let Some(method) = &record.method {
            *inner.method_counts.entry(method.clone()).or_insert(0) += 1;
        }

        // `-` and other non-numeric tokens leave the total alone.
        if let Some(bytes) = bytes {
            inner.response_bytes = inner.response_bytes.saturating_add(bytes);
        }
    }

    pub fn on_unparsable_line(&self) {
        self.lock().bad_lines += 1;
    }

    pub fn snapshot(&self, k: usize) -> StatsSnapshot {
        let mut snapshot = {
            let mut inner = self.lock();
            let top = inner.sections.top_k(k);

            StatsSnapshot {
                top_sections: ranked(top),
                section_count: inner.sections.len(),
                total_hits: inner.total_hits,
                bad_lines: inner.bad_lines,
                response_bytes: inner.response_bytes,
                status_counts: inner.status_counts.clone(),
                method_counts: inner.method_counts.clone(),
                alerts: Vec::new(),
            }
        };

        // Aggregator lock is released before the alerter's is taken.
        snapshot.alerts = self.alerter.drain_alerts();
        snapshot
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.inner.lock().expect("stats lock poisoned")
    }
}
