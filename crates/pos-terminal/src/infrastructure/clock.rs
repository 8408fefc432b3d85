//! `PowerUpDelay` implementations.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::application::device_session::PowerUpDelay;

/// Blocks the calling thread for the full delay.
///
/// Run the session manager on a blocking-capable thread (for example via
/// `tokio::task::spawn_blocking`) when this is used inside an async runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleepDelay;

impl PowerUpDelay for ThreadSleepDelay {
    fn wait(&self, duration: Duration) {
        debug!(delay_ms = duration.as_millis() as u64, "waiting for terminal power-up");
        // std sleep has no interruption path; the wait always runs to completion.
        std::thread::sleep(duration);
    }
}

/// Records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations passed to `wait`, in call order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total simulated time spent waiting.
    pub fn elapsed(&self) -> Duration {
        self.waits().into_iter().sum()
    }
}

impl PowerUpDelay for RecordingDelay {
    fn wait(&self, duration: Duration) {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
