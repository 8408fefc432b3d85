//! OS permission service adapters.

pub mod simulated;

pub use simulated::{AnsweredPrompt, SimulatedPermissionApi};
