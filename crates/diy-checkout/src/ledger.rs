//! Submission Ledger
//!
//! Subscriptions already handed to the backend during this page load, with
//! the last outcome seen for each. Every orchestrator mounted in the same
//! page load shares one ledger, so a view that unmounts and mounts again
//! never sends a second request for the same subscription.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::orchestrator::WorkflowState;

/// Page-load record of submitted subscriptions. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct SubmissionLedger {
    entries: Arc<RwLock<HashMap<String, WorkflowState>>>,
}

impl SubmissionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `subscription_id` for submission.
    ///
    /// Returns `false` if it was already reserved, or if the ledger is
    /// unusable; either way the caller must not send.
    pub fn claim(&self, subscription_id: &str) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            tracing::warn!(subscription_id = %subscription_id, "Submission ledger poisoned");
            return false;
        };
        if entries.contains_key(subscription_id) {
            return false;
        }
        entries.insert(subscription_id.to_string(), WorkflowState::Confirming);
        true
    }

    /// Record the settled state of a claimed subscription
    pub fn record(&self, subscription_id: &str, state: &WorkflowState) {
        if let Ok(mut entries) = self.entries.write() {
            if let Some(entry) = entries.get_mut(subscription_id) {
                *entry = state.clone();
            }
        }
    }

    /// Last known state of a claimed subscription.
    ///
    /// `Confirming` means the request went out and no outcome was observed.
    pub fn outcome(&self, subscription_id: &str) -> Option<WorkflowState> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(subscription_id).cloned())
    }

    pub fn is_claimed(&self, subscription_id: &str) -> bool {
        self.outcome(subscription_id).is_some()
    }
}
