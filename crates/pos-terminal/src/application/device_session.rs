//! DeviceSessionManager: brings the vendor driver layer online at start-up.
//!
//! The manager owns the driver handle for its whole lifetime (single owner,
//! single writer) and runs a short, fixed recovery sequence:
//!
//! ```text
//! initialize() ──Ok──────────────────────────────────────> set_verbose_logging(true)
//!      │
//!      └─Failed─> power_on() ─> wait(1 s) ─> initialize() ─Ok─> set_verbose_logging(true)
//!                                                  │
//!                                                  └─Failed─> (degraded)
//! ```
//!
//! At most two driver attempts are made per [`DeviceSessionManager::initialize`]
//! call.  A final `Failed` is returned to the caller, never raised: the UI
//! shell keeps running in a degraded mode.

use std::sync::Arc;
use std::time::Duration;

use pos_core::{InitStatus, SessionState};
use tracing::{debug, error, info, warn};

/// Time the terminal is given to power up before the retry.
pub const DEFAULT_POWER_UP_DELAY: Duration = Duration::from_secs(1);

/// The three driver operations the session manager needs.
///
/// Any vendor SDK exposing this surface can be substituted.  Implementations
/// live in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait DriverLayer: Send {
    /// Attempts to initialise the driver and reports the outcome.
    fn initialize(&mut self) -> InitStatus;

    /// Issues the power-on command to the terminal hardware.
    fn power_on(&mut self);

    /// Turns the driver's own detailed diagnostic logging on or off.
    fn set_verbose_logging(&mut self, enabled: bool);
}

/// Waits for the terminal hardware to power up.
///
/// Injected so tests can simulate elapsed time without sleeping, and so an
/// embedding runtime can supply its own wait strategy.
#[cfg_attr(test, mockall::automock)]
pub trait PowerUpDelay: Send + Sync {
    /// Returns once `duration` has elapsed (or is considered to have elapsed).
    fn wait(&self, duration: Duration);
}

/// The Device Session use case.
pub struct DeviceSessionManager<D: DriverLayer> {
    driver: D,
    delay: Arc<dyn PowerUpDelay>,
    power_up_delay: Duration,
    state: SessionState,
    attempts: u32,
}

impl<D: DriverLayer> DeviceSessionManager<D> {
    /// Creates a manager that owns `driver` and waits through `delay`.
    ///
    /// The power-up delay defaults to [`DEFAULT_POWER_UP_DELAY`].
    pub fn new(driver: D, delay: Arc<dyn PowerUpDelay>) -> Self {
        Self {
            driver,
            delay,
            power_up_delay: DEFAULT_POWER_UP_DELAY,
            state: SessionState::NotStarted,
            attempts: 0,
        }
    }

    /// Overrides the time waited between power-on and the retry.
    pub fn with_power_up_delay(mut self, power_up_delay: Duration) -> Self {
        self.power_up_delay = power_up_delay;
        self
    }

    /// Brings the driver online and returns the final status.
    ///
    /// Makes one attempt; if that fails, powers the terminal on, waits for
    /// the power-up delay, and retries exactly once.  On success the driver's
    /// verbose logging is switched on.  Calling this again after `Ok` simply
    /// re-runs the sequence; power-on only happens if the driver fails again.
    pub fn initialize(&mut self) -> InitStatus {
        self.state = SessionState::Attempting;

        let mut status = self.attempt();
        if !status.is_ok() {
            warn!(
                delay_ms = self.power_up_delay.as_millis() as u64,
                "driver init failed; powering on terminal before retry"
            );
            self.driver.power_on();
            self.delay.wait(self.power_up_delay);
            status = self.attempt();
        }

        if status.is_ok() {
            self.driver.set_verbose_logging(true);
            info!(attempts = self.attempts, "driver layer online");
        } else {
            error!(
                attempts = self.attempts,
                "driver init failed after power-on retry; continuing in degraded mode"
            );
        }

        self.state = status.into();
        status
    }

    fn attempt(&mut self) -> InitStatus {
        self.attempts += 1;
        let status = self.driver.initialize();
        debug!(attempt = self.attempts, ?status, "driver init attempt");
        status
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Total driver init attempts made over the manager's lifetime.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn power_up_delay(&self) -> Duration {
        self.power_up_delay
    }

    /// Borrows the owned driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Releases the driver handle.
    pub fn into_driver(self) -> D {
        self.driver
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
