mod log_file;
mod monitor;
mod tracing;

pub use log_file::{LogFile, clf_line};
pub use monitor::TestMonitor;
pub use tracing::{CapturedEvent, init_test_tracing};

use std::time::{Duration, Instant};

/// Polls `cond` until it holds or `timeout` passes, returning the last result.
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    cond()
}
