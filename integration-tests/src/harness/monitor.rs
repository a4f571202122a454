use crate::harness::LogFile;
use hitwatch_core::ingest::{LogTailer, TailError, TailOptions};
use hitwatch_core::monitor::Monitor;
use hitwatch_core::stats::{AlertParams, StatsAggregator, TimestampSource};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// A running monitor following a fresh temp log file.
///
/// The tailer runs on a plain thread, the evaluator on a private runtime.
pub struct TestMonitor {
    runtime: Runtime,
    monitor: Option<Monitor>,
    tail: Option<thread::JoinHandle<Result<(), TailError>>>,
    aggregator: Arc<StatsAggregator>,
    pub log: LogFile,
}

impl TestMonitor {
    pub fn start(threshold: usize, window_secs: u64, period: Duration) -> Self {
        Self::start_on(LogFile::new(), threshold, window_secs, period)
    }

    /// Like [`TestMonitor::start`], but follows an existing log from its current end.
    pub fn start_on(log: LogFile, threshold: usize, window_secs: u64, period: Duration) -> Self {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("failed to build test runtime");

        let monitor = {
            let _ctx = runtime.enter();
            Monitor::start_with_period(
                AlertParams {
                    threshold,
                    window_secs,
                    timestamp_source: TimestampSource::Record,
                },
                period,
            )
        };

        let tailer = LogTailer::open(
            log.path(),
            &TailOptions {
                from_start: false,
                poll_interval: Duration::from_millis(10),
            },
        )
        .expect("failed to open log file");

        let processor = monitor.processor();
        let shutdown = monitor.shutdown_signal();
        let tail = thread::spawn(move || tailer.run(&processor, shutdown));

        Self {
            runtime,
            aggregator: monitor.aggregator(),
            monitor: Some(monitor),
            tail: Some(tail),
            log,
        }
    }

    pub fn aggregator(&self) -> &StatsAggregator {
        &self.aggregator
    }

    /// Stops the evaluator and the tailer, waiting for both.
    pub fn stop(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            self.runtime.block_on(monitor.shutdown());
        }
        if let Some(tail) = self.tail.take() {
            tail.join()
                .expect("tail thread panicked")
                .expect("tail thread failed");
        }
    }
}

impl Drop for TestMonitor {
    fn drop(&mut self) {
        if !thread::panicking() {
            self.stop();
        }
    }
}
