//! `DriverLayer` implementations.
//!
//! The vendor SDK itself is closed source and is bound by whichever platform
//! shell embeds this crate.  What lives here is the scripted driver used by
//! tests and by the simulated terminal.

pub mod scripted;

pub use scripted::ScriptedDriver;
