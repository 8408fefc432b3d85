//! PermissionGate: makes sure the OS capabilities the terminal needs are
//! granted before permission-dependent features are used.
//!
//! # Deferred results (for beginners)
//!
//! Asking the user for a permission cannot return the answer directly: the
//! OS shows a dialog and reports back later through a callback.  The gate
//! models that callback as a single-shot channel keyed by [`RequestId`]:
//!
//! ```text
//! request(set) ──> PermissionApi::request_grants(missing, id)
//!     │
//!     └──> PendingGrant(id) ...awaits...
//!                                         OS dialog answered
//!                                               │
//!          deliver(id, capabilities, grants) <──┘
//!              └─ on_result(grants) ─> NoticeSink (if anything was denied)
//!              └─ fulfils PendingGrant exactly once
//! ```
//!
//! Denied permissions are never re-requested automatically.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pos_core::{Capability, Notice, PermissionSet, RequestId};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Errors raised while routing an OS permission callback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// No request with this id is pending (never issued, or already fulfilled).
    #[error("no pending permission request with id {0}")]
    UnknownRequest(RequestId),

    /// The callback reported a different number of grants than capabilities.
    #[error(
        "permission result for {request_id} has {grants} grants for {capabilities} capabilities"
    )]
    LengthMismatch {
        request_id: RequestId,
        capabilities: usize,
        grants: usize,
    },
}

/// The OS permission service.
#[cfg_attr(test, mockall::automock)]
pub trait PermissionApi: Send + Sync {
    /// Returns the current grant state of `capability`.
    fn query_grant(&self, capability: Capability) -> bool;

    /// Prompts the user for `capabilities`.
    ///
    /// Returns immediately; the answer arrives later through
    /// [`PermissionGate::deliver`] with the same `request_id`.
    fn request_grants(&self, capabilities: &[Capability], request_id: RequestId);
}

/// Displays non-fatal notices to the user (the UI shell's toast).
#[cfg_attr(test, mockall::automock)]
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// The answer to one permission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOutcome {
    pub request_id: RequestId,
    pub all_granted: bool,
    /// Capabilities the user refused, in request order.
    pub denied: Vec<Capability>,
}

/// A permission request whose answer has not necessarily arrived yet.
#[derive(Debug)]
pub struct PendingGrant {
    request_id: RequestId,
    receiver: oneshot::Receiver<GrantOutcome>,
}

impl PendingGrant {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Waits for the OS answer.
    ///
    /// Returns `None` if the gate was dropped before the answer arrived.
    pub async fn outcome(self) -> Option<GrantOutcome> {
        self.receiver.await.ok()
    }
}

/// The Permission Gate use case.
pub struct PermissionGate {
    api: Arc<dyn PermissionApi>,
    notices: Arc<dyn NoticeSink>,
    pending: Mutex<HashMap<RequestId, oneshot::Sender<GrantOutcome>>>,
}

impl PermissionGate {
    pub fn new(api: Arc<dyn PermissionApi>, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            api,
            notices,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` only if every capability in `set` is currently granted.
    ///
    /// All entries are queried so the log shows every missing capability.
    pub fn check(&self, set: &PermissionSet) -> bool {
        set.iter().fold(true, |all_granted, capability| {
            let granted = self.api.query_grant(capability);
            if !granted {
                debug!(%capability, "capability not granted");
            }
            all_granted && granted
        })
    }

    /// Prompts for every capability in `set` that is not yet granted.
    ///
    /// If nothing is missing the returned [`PendingGrant`] is already
    /// fulfilled and the OS is not prompted.
    pub fn request(&self, set: &PermissionSet) -> PendingGrant {
        let request_id = RequestId::new();
        let (sender, receiver) = oneshot::channel();
        let missing = set.missing(|c| self.api.query_grant(c));

        if missing.is_empty() {
            // Receiver is held below, so this send cannot fail.
            let _ = sender.send(GrantOutcome {
                request_id,
                all_granted: true,
                denied: Vec::new(),
            });
        } else {
            self.lock_pending().insert(request_id, sender);
            info!(%request_id, count = missing.len(), "requesting missing permissions");
            self.api.request_grants(missing.as_slice(), request_id);
        }

        PendingGrant {
            request_id,
            receiver,
        }
    }

    /// Checks `set` and requests it only if something is missing.
    ///
    /// Returns `None` when everything is already granted.
    pub fn ensure_granted(&self, set: &PermissionSet) -> Option<PendingGrant> {
        if self.check(set) {
            debug!("all required permissions already granted");
            None
        } else {
            Some(self.request(set))
        }
    }

    /// Evaluates a list of grant results.
    ///
    /// Returns `true` if every entry is granted (an empty list counts as
    /// granted).  Otherwise emits the degraded-mode notice once and returns
    /// `false`.
    pub fn on_result(&self, grants: &[bool]) -> bool {
        let all_granted = grants.iter().all(|granted| *granted);
        if !all_granted {
            warn!(
                denied = grants.iter().filter(|g| !**g).count(),
                "permissions denied; continuing in degraded mode"
            );
            self.notices.notify(&Notice::permission_denied());
        }
        all_granted
    }

    /// Routes the OS callback for `request_id` to its [`PendingGrant`].
    ///
    /// # Errors
    ///
    /// - [`PermissionError::UnknownRequest`] if no such request is pending.
    /// - [`PermissionError::LengthMismatch`] if `grants` and `capabilities`
    ///   differ in length; the request stays pending.
    pub fn deliver(
        &self,
        request_id: RequestId,
        capabilities: &[Capability],
        grants: &[bool],
    ) -> Result<GrantOutcome, PermissionError> {
        let sender = {
            let mut pending = self.lock_pending();
            if !pending.contains_key(&request_id) {
                return Err(PermissionError::UnknownRequest(request_id));
            }
            if capabilities.len() != grants.len() {
                return Err(PermissionError::LengthMismatch {
                    request_id,
                    capabilities: capabilities.len(),
                    grants: grants.len(),
                });
            }
            pending
                .remove(&request_id)
                .ok_or(PermissionError::UnknownRequest(request_id))?
        };

        let all_granted = self.on_result(grants);
        let denied = capabilities
            .iter()
            .zip(grants)
            .filter(|(_, granted)| !**granted)
            .map(|(capability, _)| *capability)
            .collect();
        let outcome = GrantOutcome {
            request_id,
            all_granted,
            denied,
        };

        if sender.send(outcome.clone()).is_err() {
            debug!(%request_id, "permission result arrived after the requester went away");
        }
        Ok(outcome)
    }

    /// Number of requests still waiting for an OS answer.
    pub fn pending_requests(&self) -> usize {
        self.lock_pending().len()
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<RequestId, oneshot::Sender<GrantOutcome>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
