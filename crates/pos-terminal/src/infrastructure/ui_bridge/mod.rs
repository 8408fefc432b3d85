//! Command bridge between the terminal core and the UI shell.
//!
//! Exposes driver and permission readiness to whatever shell hosts the
//! terminal (settings screen, status bar).  Only this module references both
//! the application layer and the presentation-facing DTOs.
//!
//! # DTOs (Data Transfer Objects)
//!
//! `TerminalAppState` uses async `Mutex`es and is not directly serializable.
//! `TerminalStatusDto` is a plain snapshot that derives `Serialize` so the
//! shell can receive it as JSON:
//!
//! ```json
//! {
//!   "success": true,
//!   "data": {
//!     "terminal_name": "pos-terminal",
//!     "readiness": "Degraded",
//!     "degraded_reasons": ["PermissionDenied"],
//!     "driver_state": "Ok",
//!     "permission_status": "Denied",
//!     ...
//!   },
//!   "error": null
//! }
//! ```
//!
//! # Notices
//!
//! [`NoticeBoard`] is the [`NoticeSink`] handed to the permission gate.  It
//! keeps every notice so the shell can show them as toasts, and logs each
//! one at `warn` level.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use pos_core::{DegradedReason, InitStatus, Notice, Readiness, SessionState};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::permission_gate::NoticeSink;

// ── Notices ───────────────────────────────────────────────────────────────────

/// Collects user-visible notices for the UI shell.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: StdMutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices posted so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NoticeSink for NoticeBoard {
    fn notify(&self, notice: &Notice) {
        warn!(reason = ?notice.reason, "{}", notice.message);
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

// ── Shared application state ──────────────────────────────────────────────────

/// Permission readiness as seen by the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// The gate has not run yet.
    Unknown,
    /// A prompt is on screen; the answer has not arrived.
    Pending,
    Granted,
    Denied,
}

/// Runtime state shared between shell commands.
pub struct TerminalAppState {
    /// Identifies this run of the terminal in logs and status snapshots.
    pub session_id: Uuid,
    pub terminal_name: Mutex<String>,
    pub driver_state: Mutex<SessionState>,
    pub permission_status: Mutex<PermissionStatus>,
    pub notices: Arc<NoticeBoard>,
}

impl TerminalAppState {
    pub fn new(terminal_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            session_id: Uuid::new_v4(),
            terminal_name: Mutex::new(terminal_name.into()),
            driver_state: Mutex::new(SessionState::NotStarted),
            permission_status: Mutex::new(PermissionStatus::Unknown),
            notices: Arc::new(NoticeBoard::new()),
        })
    }

    /// Combines the current driver and permission state into a verdict.
    pub async fn readiness(&self) -> Readiness {
        let driver = *self.driver_state.lock().await;
        let permissions = *self.permission_status.lock().await;
        Readiness::assess(driver, permissions == PermissionStatus::Granted)
    }
}

// ── DTOs ──────────────────────────────────────────────────────────────────────

/// Full status snapshot returned to the UI shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalStatusDto {
    pub session_id: String,
    pub terminal_name: String,
    /// `"Ready"` or `"Degraded"`.
    pub readiness: String,
    pub degraded_reasons: Vec<DegradedReason>,
    pub driver_state: String,
    pub permission_status: String,
    pub notices: Vec<String>,
}

/// Unified response wrapper for shell commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Records the final driver status.  A `Failed` status posts the
/// initialisation-failure notice.
pub async fn record_driver_status(state: Arc<TerminalAppState>, status: InitStatus) {
    *state.driver_state.lock().await = status.into();
    if !status.is_ok() {
        state.notices.notify(&Notice::initialization_failed());
    }
}

pub async fn record_permission_status(state: Arc<TerminalAppState>, status: PermissionStatus) {
    *state.permission_status.lock().await = status;
}

/// Returns the current terminal status snapshot.
pub async fn get_terminal_status(state: Arc<TerminalAppState>) -> CommandResult<TerminalStatusDto> {
    let readiness = state.readiness().await;
    let driver = *state.driver_state.lock().await;
    let permissions = *state.permission_status.lock().await;
    let name = state.terminal_name.lock().await.clone();

    let (readiness_label, degraded_reasons) = match readiness {
        Readiness::Ready => ("Ready".to_string(), Vec::new()),
        Readiness::Degraded(reasons) => ("Degraded".to_string(), reasons),
    };

    CommandResult::ok(TerminalStatusDto {
        session_id: state.session_id.to_string(),
        terminal_name: name,
        readiness: readiness_label,
        degraded_reasons,
        driver_state: format!("{driver:?}"),
        permission_status: format!("{permissions:?}"),
        notices: state.notices.notices().into_iter().map(|n| n.message).collect(),
    })
}

/// Returns every notice posted so far.
pub async fn get_notices(state: Arc<TerminalAppState>) -> CommandResult<Vec<Notice>> {
    CommandResult::ok(state.notices.notices())
}

/// Renames the terminal.  Blank names are rejected.
pub async fn update_terminal_name(state: Arc<TerminalAppState>, name: String) -> CommandResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return CommandResult::err("terminal name must not be empty");
    }
    info!(terminal_name = name, "terminal renamed");
    *state.terminal_name.lock().await = name.to_string();
    CommandResult::ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
