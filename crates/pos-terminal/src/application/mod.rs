//! Application layer use cases for the terminal.
//!
//! Use cases here depend only on traits (`DriverLayer`, `PowerUpDelay`,
//! `PermissionApi`, `NoticeSink`); the concrete adapters live in
//! `infrastructure` and are injected at construction time.
//!
//! - **`device_session`** – Owns the driver handle and runs the
//!   initialise / power-on / retry sequence.
//!
//! - **`permission_gate`** – Checks the required OS capabilities, requests
//!   the missing ones, and resolves the deferred answer exactly once.

pub mod device_session;
pub mod permission_gate;
