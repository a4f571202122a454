use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum AlertState {
    Low,
    High,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum TransitionKind {
    EnterHigh,
    EnterLow,
}

/// A recorded state change and the evaluation time (Unix seconds) it happened at.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct AlertTransition {
    pub kind: TransitionKind,
    pub at: i64,
}

impl AlertTransition {
    pub fn new(kind: TransitionKind, at: i64) -> Self {
        Self { kind, at }
    }
}

/// High-traffic detector: `High` while the last `min_count` events all fall
/// within the trailing `window_secs`.
///
/// Only the most recent `min_count` timestamps are kept, in a circular buffer.
/// The buffer is always non-decreasing in logical order, which makes it two
/// sorted runs split at `write_index`.
#[derive(Debug)]
pub struct WindowAlerter {
    min_count: usize,
    window_secs: i64,
    inner: Mutex<AlerterState>,
}

#[derive(Debug)]
struct AlerterState {
    timestamps: Vec<i64>,
    // Logical start (oldest slot) once the buffer is full.
    write_index: usize,
    state: AlertState,
    pending: Vec<AlertTransition>,
}

impl WindowAlerter {
    pub fn new(min_count: usize, window_secs: u64) -> Self {
        let min_count = min_count.max(1);

        Self {
            min_count,
            window_secs: i64::try_from(window_secs).unwrap_or(i64::MAX),
            inner: Mutex::new(AlerterState {
                // Grows to `min_count` as events arrive.
                timestamps: Vec::new(),
                write_index: 0,
                state: AlertState::Low,
                pending: Vec::new(),
            }),
        }
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    pub fn window_secs(&self) -> i64 {
        self.window_secs
    }

    pub fn state(&self) -> AlertState {
        self.lock().state
    }

    pub fn add_event(&self, ts: i64) {
        let mut inner = self.lock();
        let len = inner.timestamps.len();

        // Clamp to the newest stored timestamp so the runs stay sorted under clock skew.
        let ts = match inner.newest() {
            Some(prev) if ts < prev => {
                tracing::trace!(ts, prev, "event timestamp went backwards; clamped");
                prev
            }
            _ => ts,
        };

        if len < self.min_count {
            inner.timestamps.push(ts);
        } else {
            let idx = inner.write_index;
            inner.timestamps[idx] = ts;
            inner.write_index = (idx + 1) % self.min_count;
        }
    }

    /// Re-evaluates the window at `now`, recording a transition if the state flips.
    pub fn evaluate(&self, now: i64) -> Option<AlertTransition> {
        let mut inner = self.lock();

        if inner.timestamps.len() < self.min_count {
            return None;
        }

        let window_start = now.saturating_sub(self.window_secs);
        let in_window = inner.count_at_or_after(window_start);

        let transition = match inner.state {
            AlertState::High if in_window < self.min_count => {
                inner.state = AlertState::Low;
                AlertTransition::new(TransitionKind::EnterLow, now)
            }
            AlertState::Low if in_window == self.min_count => {
                inner.state = AlertState::High;
                AlertTransition::new(TransitionKind::EnterHigh, now)
            }
            _ => return None,
        };

        inner.pending.push(transition);
        Some(transition)
    }

    /// Takes every transition recorded since the previous drain.
    pub fn drain_alerts(&self) -> Vec<AlertTransition> {
        std::mem::take(&mut self.lock().pending)
    }

    #[cfg(test)]
    pub(crate) fn stored_timestamps(&self) -> Vec<i64> {
        let inner = self.lock();
        let (newer, older) = inner.timestamps.split_at(inner.write_index);
        older.iter().chain(newer).copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, AlerterState> {
        self.inner.lock().expect("alerter lock poisoned")
    }
}

impl AlerterState {
    fn newest(&self) -> Option<i64> {
        if self.timestamps.is_empty() {
            return None;
        }
        let len = self.timestamps.len();
        Some(self.timestamps[(self.write_index + len - 1) % len])
    }

    /// Number of stored timestamps `>= start`, by binary search over both sorted runs.
    fn count_at_or_after(&self, start: i64) -> usize {
        let (newer, older) = self.timestamps.split_at(self.write_index);

        let older_in = older.len() - older.partition_point(|&ts| ts < start);
        let newer_in = newer.len() - newer.partition_point(|&ts| ts < start);

        older_in + newer_in
    }
}
