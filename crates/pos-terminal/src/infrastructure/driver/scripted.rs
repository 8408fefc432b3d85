//! Scripted driver layer for tests and the simulated terminal.
//!
//! # Why a scripted driver?
//!
//! The real vendor driver talks to terminal hardware that:
//!
//! - Is only present on the POS device itself.
//! - Fails or succeeds for reasons a test cannot control (power state,
//!   firmware, cabling).
//!
//! `ScriptedDriver` replaces all hardware calls with a fixed script of
//! [`InitStatus`] results and records every call, so assertions can check
//! exactly how often initialisation, power-on, and verbose logging happened.
//!
//! # Usage in tests
//!
//! ```ignore
//! let driver = ScriptedDriver::new([InitStatus::Failed, InitStatus::Ok]);
//! let mut manager = DeviceSessionManager::new(driver, Arc::new(RecordingDelay::new()));
//!
//! assert_eq!(manager.initialize(), InitStatus::Ok);
//! assert_eq!(manager.driver().power_on_calls, 1);
//! ```

use std::collections::VecDeque;

use pos_core::InitStatus;

use crate::application::device_session::DriverLayer;

/// A driver that replays scripted init results and records all calls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    script: VecDeque<InitStatus>,
    /// Returned once the script runs out.  Starts as `Ok`.
    last: Option<InitStatus>,
    /// Number of `initialize` calls.
    pub init_calls: u32,
    /// Number of `power_on` calls.
    pub power_on_calls: u32,
    /// Every value passed to `set_verbose_logging`, in call order.
    pub verbose_logging: Vec<bool>,
}

impl ScriptedDriver {
    /// Creates a driver that returns `script` in order.
    ///
    /// Once the script is exhausted the last entry repeats; an empty script
    /// always reports `Ok`.
    pub fn new(script: impl IntoIterator<Item = InitStatus>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Fails the first `failures` init attempts, then reports `Ok`.
    pub fn failing_first(failures: u32) -> Self {
        Self::new(
            std::iter::repeat(InitStatus::Failed)
                .take(failures as usize)
                .chain(std::iter::once(InitStatus::Ok)),
        )
    }

    /// Whether verbose logging is currently switched on.
    pub fn verbose_logging_enabled(&self) -> bool {
        self.verbose_logging.last().copied().unwrap_or(false)
    }
}

impl DriverLayer for ScriptedDriver {
    fn initialize(&mut self) -> InitStatus {
        self.init_calls += 1;
        let status = self
            .script
            .pop_front()
            .or(self.last)
            .unwrap_or(InitStatus::Ok);
        self.last = Some(status);
        status
    }

    fn power_on(&mut self) {
        self.power_on_calls += 1;
    }

    fn set_verbose_logging(&mut self, enabled: bool) {
        self.verbose_logging.push(enabled);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_script_always_reports_ok() {
        let mut driver = ScriptedDriver::default();
        assert_eq!(driver.initialize(), InitStatus::Ok);
        assert_eq!(driver.initialize(), InitStatus::Ok);
        assert_eq!(driver.init_calls, 2);
    }

    #[test]
    fn test_last_scripted_status_repeats() {
        let mut driver = ScriptedDriver::new([InitStatus::Ok, InitStatus::Failed]);

        assert_eq!(driver.initialize(), InitStatus::Ok);
        assert_eq!(driver.initialize(), InitStatus::Failed);
        assert_eq!(driver.initialize(), InitStatus::Failed);
    }

    #[test]
    fn test_failing_first_fails_then_succeeds() {
        let mut driver = ScriptedDriver::failing_first(2);

        let results: Vec<_> = (0..4).map(|_| driver.initialize()).collect();

        assert_eq!(
            results,
            vec![InitStatus::Failed, InitStatus::Failed, InitStatus::Ok, InitStatus::Ok]
        );
    }

    #[test]
    fn test_records_power_on_and_verbose_logging_calls() {
        let mut driver = ScriptedDriver::default();

        driver.power_on();
        driver.set_verbose_logging(true);

        assert_eq!(driver.power_on_calls, 1);
        assert_eq!(driver.verbose_logging, vec![true]);
        assert!(driver.verbose_logging_enabled());
    }
}
