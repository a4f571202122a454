use crate::stats::alerter::{TransitionKind, WindowAlerter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const EVALUATION_PERIOD: Duration = Duration::from_secs(1);

/// Spawns the periodic alert evaluator on the current Tokio runtime.
///
/// Evaluates against the wall clock every `period` until `shutdown` is set to
/// `true` or its sender is dropped. Await the handle before tearing down state.
pub fn spawn_evaluator(
    alerter: Arc<WindowAlerter>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(
            threshold = alerter.min_count(),
            window_secs = alerter.window_secs(),
            "alert evaluator started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = chrono::Utc::now().timestamp();
                    match alerter.evaluate(now) {
                        Some(t) if t.kind == TransitionKind::EnterHigh => {
                            tracing::warn!(at = t.at, threshold = alerter.min_count(), "high traffic alert raised");
                        }
                        Some(t) => {
                            tracing::info!(at = t.at, "high traffic alert recovered");
                        }
                        None => {}
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("alert evaluator stopped");
    })
}
