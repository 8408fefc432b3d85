//! Integration tests for the driver session.
//!
//! These tests exercise `DeviceSessionManager` end-to-end with the scripted
//! driver and the recording delay from the infrastructure layer.

use std::sync::Arc;
use std::time::Duration;

use pos_core::{InitStatus, SessionState};
use pos_terminal::application::device_session::DeviceSessionManager;
use pos_terminal::infrastructure::{clock::RecordingDelay, driver::ScriptedDriver};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_failed_then_ok_enables_verbose_logging_exactly_once() {
    let delay = Arc::new(RecordingDelay::new());
    let mut manager = DeviceSessionManager::new(ScriptedDriver::failing_first(1), delay.clone());

    let status = manager.initialize();

    assert_eq!(status, InitStatus::Ok);
    assert_eq!(manager.state(), SessionState::Ok);
    let driver = manager.driver();
    assert_eq!(driver.init_calls, 2);
    assert_eq!(driver.power_on_calls, 1);
    assert_eq!(driver.verbose_logging, vec![true]);
    assert_eq!(delay.waits(), vec![Duration::from_secs(1)]);
}

#[test]
fn test_failed_twice_never_enables_verbose_logging() {
    let delay = Arc::new(RecordingDelay::new());
    let driver = ScriptedDriver::new([InitStatus::Failed]);
    let mut manager = DeviceSessionManager::new(driver, delay.clone());

    let status = manager.initialize();

    assert_eq!(status, InitStatus::Failed);
    assert_eq!(manager.state(), SessionState::Failed);
    let driver = manager.into_driver();
    assert_eq!(driver.init_calls, 2);
    assert_eq!(driver.power_on_calls, 1);
    assert!(driver.verbose_logging.is_empty());
    assert_eq!(delay.waits().len(), 1);
}

#[test]
fn test_initial_ok_skips_power_on_and_delay() {
    let delay = Arc::new(RecordingDelay::new());
    let mut manager = DeviceSessionManager::new(ScriptedDriver::default(), delay.clone());

    assert_eq!(manager.initialize(), InitStatus::Ok);

    assert_eq!(manager.driver().init_calls, 1);
    assert_eq!(manager.driver().power_on_calls, 0);
    assert!(delay.waits().is_empty());
}

#[test]
fn test_initialize_never_makes_more_than_two_attempts() {
    for failures in 0..6 {
        let delay = Arc::new(RecordingDelay::new());
        let mut manager =
            DeviceSessionManager::new(ScriptedDriver::failing_first(failures), delay.clone());

        let status = manager.initialize();

        let driver = manager.driver();
        assert!(driver.init_calls <= 2, "failures={failures}");
        assert!(driver.power_on_calls <= 1, "failures={failures}");
        assert_eq!(status.is_ok(), failures <= 1, "failures={failures}");
        assert_eq!(
            driver.power_on_calls,
            u32::from(failures > 0),
            "power-on happens only after a failed first attempt (failures={failures})"
        );
    }
}

#[test]
fn test_reinitialize_after_ok_does_not_power_on_again() {
    let delay = Arc::new(RecordingDelay::new());
    let mut manager = DeviceSessionManager::new(ScriptedDriver::failing_first(1), delay.clone());

    assert_eq!(manager.initialize(), InitStatus::Ok);
    assert_eq!(manager.initialize(), InitStatus::Ok);

    let driver = manager.driver();
    assert_eq!(driver.power_on_calls, 1);
    assert_eq!(driver.init_calls, 3);
    assert_eq!(manager.attempts(), 3);
    assert_eq!(delay.waits().len(), 1);
}

#[test]
fn test_configured_power_up_delay_is_simulated_not_slept() {
    let delay = Arc::new(RecordingDelay::new());
    let mut manager = DeviceSessionManager::new(ScriptedDriver::failing_first(1), delay.clone())
        .with_power_up_delay(Duration::from_secs(60));
    let started = std::time::Instant::now();

    manager.initialize();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(delay.elapsed(), Duration::from_secs(60));
}
