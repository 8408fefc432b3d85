//! # pos-core
//!
//! Shared domain types for bringing a SmartPOS terminal online: the OS
//! capabilities the terminal needs, the result of a driver initialisation
//! attempt, and the readiness verdict reported to the UI shell.
//!
//! This crate has zero dependencies on OS APIs, vendor SDKs, UI frameworks,
//! or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! A payment terminal app has two things to sort out before its hardware
//! functions (card reader, printer, Bluetooth pairing) are usable:
//!
//! 1. The vendor **driver layer** must be initialised.  If the first attempt
//!    fails, the terminal is powered on and initialisation is retried once.
//! 2. The **OS permissions** the driver depends on (storage, Bluetooth,
//!    location) must be granted by the user.
//!
//! Neither failure is fatal: the app keeps running in a *degraded mode* and
//! tells the user which functions may be unavailable.
//!
//! - **`domain::capability`** – The fixed set of OS capabilities and the
//!   request identifier that ties a permission prompt to its answer.
//! - **`domain::session`** – Init status, session state, notices, and the
//!   overall readiness verdict.

pub mod domain;

pub use domain::capability::{Capability, ParseCapabilityError, PermissionSet, RequestId};
pub use domain::session::{DegradedReason, InitStatus, Notice, Readiness, SessionState};
