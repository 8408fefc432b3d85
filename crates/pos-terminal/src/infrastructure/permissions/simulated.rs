//! In-memory OS permission service.
//!
//! Holds a grant table and a queue of unanswered prompts.  Prompts are not
//! answered when they are issued; the host runtime calls
//! [`SimulatedPermissionApi::answer_prompts`] later (the equivalent of the
//! user tapping through the dialog) and routes each [`AnsweredPrompt`] to
//! `PermissionGate::deliver`.
//!
//! The simulated user grants everything except the capabilities listed as
//! refused at construction.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pos_core::{Capability, RequestId};
use tracing::debug;

use crate::application::permission_gate::PermissionApi;

/// The user's answer to one prompt, ready to pass to `PermissionGate::deliver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredPrompt {
    pub request_id: RequestId,
    pub capabilities: Vec<Capability>,
    /// One entry per capability, in the same order.
    pub grants: Vec<bool>,
}

#[derive(Debug, Default)]
struct State {
    granted: HashSet<Capability>,
    queued: Vec<(RequestId, Vec<Capability>)>,
    prompts_issued: usize,
}

/// A permission service backed by an in-memory grant table.
#[derive(Debug, Default)]
pub struct SimulatedPermissionApi {
    state: Mutex<State>,
    refused: HashSet<Capability>,
}

impl SimulatedPermissionApi {
    /// Creates a service where `granted` are already authorised and the user
    /// will refuse `refused` when prompted.
    pub fn new(
        granted: impl IntoIterator<Item = Capability>,
        refused: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                granted: granted.into_iter().collect(),
                ..State::default()
            }),
            refused: refused.into_iter().collect(),
        }
    }

    /// Answers every queued prompt and updates the grant table.
    pub fn answer_prompts(&self) -> Vec<AnsweredPrompt> {
        let mut state = self.lock();
        let queued = std::mem::take(&mut state.queued);

        queued
            .into_iter()
            .map(|(request_id, capabilities)| {
                let grants: Vec<bool> = capabilities
                    .iter()
                    .map(|c| !self.refused.contains(c))
                    .collect();
                for (capability, granted) in capabilities.iter().zip(&grants) {
                    if *granted {
                        state.granted.insert(*capability);
                    }
                }
                debug!(%request_id, ?grants, "simulated user answered prompt");
                AnsweredPrompt {
                    request_id,
                    capabilities,
                    grants,
                }
            })
            .collect()
    }

    /// Prompts issued but not yet answered.
    pub fn queued_prompts(&self) -> usize {
        self.lock().queued.len()
    }

    /// Total prompts issued over the service's lifetime.
    pub fn prompts_issued(&self) -> usize {
        self.lock().prompts_issued
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PermissionApi for SimulatedPermissionApi {
    fn query_grant(&self, capability: Capability) -> bool {
        self.lock().granted.contains(&capability)
    }

    fn request_grants(&self, capabilities: &[Capability], request_id: RequestId) {
        let mut state = self.lock();
        state.prompts_issued += 1;
        state.queued.push((request_id, capabilities.to_vec()));
        debug!(%request_id, count = capabilities.len(), "permission prompt queued");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_grant_reflects_initial_grants() {
        let api = SimulatedPermissionApi::new([Capability::Storage], []);

        assert!(api.query_grant(Capability::Storage));
        assert!(!api.query_grant(Capability::RadioScan));
    }

    #[test]
    fn test_prompt_is_not_answered_until_asked() {
        // Arrange
        let api = SimulatedPermissionApi::default();
        let id = RequestId::new();

        // Act
        api.request_grants(&[Capability::RadioScan], id);

        // Assert
        assert_eq!(api.queued_prompts(), 1);
        assert!(!api.query_grant(Capability::RadioScan));
    }

    #[test]
    fn test_answer_prompts_refuses_configured_capabilities_and_grants_the_rest() {
        // Arrange
        let api = SimulatedPermissionApi::new([], [Capability::FineLocation]);
        let id = RequestId::new();
        api.request_grants(&[Capability::CoarseLocation, Capability::FineLocation], id);

        // Act
        let answered = api.answer_prompts();

        // Assert
        assert_eq!(
            answered,
            vec![AnsweredPrompt {
                request_id: id,
                capabilities: vec![Capability::CoarseLocation, Capability::FineLocation],
                grants: vec![true, false],
            }]
        );
        assert!(api.query_grant(Capability::CoarseLocation));
        assert!(!api.query_grant(Capability::FineLocation));
        assert_eq!(api.queued_prompts(), 0);
        assert_eq!(api.prompts_issued(), 1);
    }
}
