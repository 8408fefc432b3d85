//! pos-terminal library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does pos-terminal do? (for beginners)
//!
//! A SmartPOS terminal app has to get two things in order at start-up:
//!
//! 1. Bring the vendor driver layer online.  If the first attempt fails the
//!    terminal is powered on, given a second to wake up, and initialised once
//!    more.  No further retries happen automatically.
//! 2. Make sure the OS has granted the storage, Bluetooth, and location
//!    permissions the driver relies on, prompting the user for any that are
//!    missing.
//!
//! Both steps report to the UI shell.  Failure in either one leaves the app
//! usable in a degraded mode.

/// Application layer: the device session and permission gate use cases.
pub mod application;

/// Infrastructure layer: driver adapters, delays, permission adapter,
/// configuration, and the UI bridge.
pub mod infrastructure;
