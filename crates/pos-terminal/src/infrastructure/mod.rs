//! Infrastructure layer for the terminal application.
//!
//! Contains the adapters injected into the application layer: driver
//! implementations, power-up delays, the OS permission adapter, TOML
//! configuration, and the UI shell bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and `pos_core`,
//! but MUST NOT be imported by the `application` or domain layers.
//!
//! # Sub-modules
//!
//! - **`driver`** – `DriverLayer` implementations.  `ScriptedDriver` replays a
//!   fixed sequence of init results and records every call; it backs both the
//!   tests and the simulated terminal run by the binary.
//!
//! - **`clock`** – `PowerUpDelay` implementations: a real blocking sleep and
//!   a recording delay that returns immediately.
//!
//! - **`permissions`** – An in-memory OS permission service whose prompts are
//!   answered on demand.
//!
//! - **`storage`** – Configuration file persistence.
//!
//! - **`ui_bridge`** – Shared state, DTOs, and commands exposing driver and
//!   permission readiness to the UI shell.

pub mod clock;
pub mod driver;
pub mod permissions;
pub mod storage;
pub mod ui_bridge;
