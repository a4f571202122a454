//! Ties the stats engine to its background evaluator.

use crate::ingest::LineProcessor;
use crate::stats::{AlertParams, EVALUATION_PERIOD, StatsAggregator, spawn_evaluator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// A running aggregator plus the task that evaluates its alerter.
///
/// Must be started from inside a Tokio runtime. Call [`Monitor::shutdown`] to
/// stop the evaluator; it is joined before the method returns.
pub struct Monitor {
    aggregator: Arc<StatsAggregator>,
    shutdown_tx: watch::Sender<bool>,
    evaluator: Option<JoinHandle<()>>,
}

impl Monitor {
    pub fn start(params: AlertParams) -> Self {
        Self::start_with_period(params, EVALUATION_PERIOD)
    }

    pub fn start_with_period(params: AlertParams, period: Duration) -> Self {
        let aggregator = Arc::new(StatsAggregator::new(params));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let evaluator = spawn_evaluator(aggregator.alerter(), period, shutdown_rx);

        Self {
            aggregator,
            shutdown_tx,
            evaluator: Some(evaluator),
        }
    }

    pub fn aggregator(&self) -> Arc<StatsAggregator> {
        self.aggregator.clone()
    }

    /// A line sink feeding this monitor's aggregator.
    pub fn processor(&self) -> LineProcessor {
        LineProcessor::new(self.aggregator.clone())
    }

    /// Flips to `true` once shutdown begins. Hand to every worker.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Resolves only if the evaluator exits on its own, which is a fatal condition.
    pub async fn evaluator_exited(&mut self) -> Result<(), JoinError> {
        match self.evaluator.as_mut() {
            Some(handle) => {
                let res = handle.await;
                self.evaluator = None;
                res
            }
            None => std::future::pending().await,
        }
    }

    pub async fn shutdown(self) {
        self.shutdown_tx.send_replace(true);

        if let Some(evaluator) = self.evaluator {
            if let Err(e) = evaluator.await {
                tracing::error!(error = %e, "alert evaluator task failed");
            }
        }
    }
}
