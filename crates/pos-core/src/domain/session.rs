//! Driver session status, user-visible notices, and terminal readiness.
//!
//! # Degraded mode (for beginners)
//!
//! Neither a driver that refuses to come online nor a denied permission stops
//! the terminal app.  Instead the app keeps running with some functions
//! switched off and shows a [`Notice`] explaining why.  The two causes are
//! listed in [`DegradedReason`]; [`Readiness::assess`] combines them into a
//! single verdict for the UI shell.

use serde::{Deserialize, Serialize};

/// Result of a single driver initialisation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitStatus {
    Ok,
    Failed,
}

impl InitStatus {
    pub fn is_ok(self) -> bool {
        matches!(self, InitStatus::Ok)
    }
}

/// Lifecycle of the driver session.
///
/// ```text
/// NotStarted ──> Attempting ──> Ok
///                    │
///                    └────────> Failed
/// ```
///
/// `Ok` and `Failed` are terminal for a single `initialize` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    Attempting,
    Ok,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Ok | SessionState::Failed)
    }
}

impl From<InitStatus> for SessionState {
    fn from(status: InitStatus) -> Self {
        match status {
            InitStatus::Ok => SessionState::Ok,
            InitStatus::Failed => SessionState::Failed,
        }
    }
}

/// Why the terminal is running with reduced functionality.
///
/// Both reasons are recovered locally; neither propagates as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegradedReason {
    /// The driver layer did not report success after the power-on retry.
    InitializationFailure,
    /// At least one required OS capability was not granted.
    PermissionDenied,
}

/// A non-fatal, user-visible notice (shown as a toast by the UI shell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub reason: DegradedReason,
    pub message: String,
}

impl Notice {
    pub fn initialization_failed() -> Self {
        Self {
            reason: DegradedReason::InitializationFailure,
            message: "Device driver did not come online; hardware functions are unavailable"
                .to_string(),
        }
    }

    pub fn permission_denied() -> Self {
        Self {
            reason: DegradedReason::PermissionDenied,
            message: "Some functionality may be degraded without the requested permissions"
                .to_string(),
        }
    }
}

/// Overall readiness of the terminal as reported to the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    Ready,
    /// Running with the listed dependencies unavailable.  Never empty.
    Degraded(Vec<DegradedReason>),
}

impl Readiness {
    /// Combines the driver state and the permission outcome.
    ///
    /// Any driver state other than `Ok` (including one that has not finished
    /// yet) counts as an initialisation failure.  A failed driver degrades the
    /// terminal; it never blocks it.
    pub fn assess(driver: SessionState, permissions_granted: bool) -> Self {
        let mut reasons = Vec::new();
        if driver != SessionState::Ok {
            reasons.push(DegradedReason::InitializationFailure);
        }
        if !permissions_granted {
            reasons.push(DegradedReason::PermissionDenied);
        }

        if reasons.is_empty() {
            Readiness::Ready
        } else {
            Readiness::Degraded(reasons)
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
