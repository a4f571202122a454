use crate::stats::alerter::AlertTransition;
use serde::Serialize;
use std::collections::HashMap;

/// Point-in-time report produced by `StatsAggregator::snapshot`.
///
/// Counters and top sections are mutually consistent. `alerts` is drained
/// separately and may include transitions evaluated slightly later.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSnapshot {
    /// Highest-traffic sections, count descending then name ascending.
    pub top_sections: Vec<(String, u64)>,
    pub section_count: usize,

    pub total_hits: u64,
    pub bad_lines: u64,
    pub response_bytes: u64,

    pub status_counts: HashMap<u16, u64>,
    pub method_counts: HashMap<String, u64>,

    pub alerts: Vec<AlertTransition>,
}

/// Orders `(key, count)` pairs by count descending, ties by key ascending.
pub fn ranked<K: Ord>(pairs: impl IntoIterator<Item = (K, u64)>) -> Vec<(K, u64)> {
    let mut out: Vec<_> = pairs.into_iter().collect();
    out.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    out
}
