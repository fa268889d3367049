//! Confirmation Orchestrator
//!
//! Joins the three inputs of a payment return (redirect parameters, the staged
//! checkout intent and the current identity) and drives at most one
//! confirmation request per page load.
//!
//! The orchestrator does no I/O of its own. The host calls [`advance`] every
//! time one of its reactive inputs changes; the first call that finds every
//! input ready returns [`Transition::Submit`]. The host sends that request and
//! hands the outcome to [`settle`]. [`run`] chains the three steps for hosts
//! that can hold the orchestrator across an await.
//!
//! The send-once guard spans the page load, not the orchestrator: hosts that
//! may mount the view more than once share a [`SubmissionLedger`] through
//! [`with_ledger`], and a later mount adopts the recorded outcome instead of
//! sending again.
//!
//! ```text
//! AwaitingIdentity ──identity──▶ AwaitingIntentMatch ──token match──▶ Confirming
//!                                        │                              │
//!                                        ▼                        ┌─────┴─────┐
//!                           Failed(IntentMissing|IntentMismatch)  ▼           ▼
//!                                                             Succeeded   Failed(reason)
//! ```
//!
//! [`advance`]: ConfirmationOrchestrator::advance
//! [`settle`]: ConfirmationOrchestrator::settle
//! [`run`]: ConfirmationOrchestrator::run
//! [`with_ledger`]: ConfirmationOrchestrator::with_ledger

use crate::backend::{ConfirmationBackend, ConfirmationRequest};
use crate::error::{CheckoutError, Result};
use crate::identity::IdentitySnapshot;
use crate::intent::{CheckoutIntent, IntentStore, KeyValueStorage};
use crate::ledger::SubmissionLedger;
use crate::notify::{Notification, NotificationSink};
use crate::redirect::RedirectParams;

/// Internal workflow state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    AwaitingIdentity,
    AwaitingIntentMatch,
    Confirming,
    Succeeded,
    Failed(CheckoutError),
}

/// Render-able status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    Matching,
    Confirming,
    Succeeded,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Succeeded | WorkflowState::Failed(_))
    }

    pub fn status(&self) -> WorkflowStatus {
        match self {
            WorkflowState::AwaitingIdentity => WorkflowStatus::Idle,
            WorkflowState::AwaitingIntentMatch => WorkflowStatus::Matching,
            WorkflowState::Confirming => WorkflowStatus::Confirming,
            WorkflowState::Succeeded => WorkflowStatus::Succeeded,
            WorkflowState::Failed(_) => WorkflowStatus::Failed,
        }
    }

    /// Failure reason, if failed
    pub fn failure(&self) -> Option<&CheckoutError> {
        match self {
            WorkflowState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What the host should do after [`ConfirmationOrchestrator::advance`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to send
    Idle,
    /// Send this request, then call [`ConfirmationOrchestrator::settle`]
    Submit(ConfirmationRequest),
}

/// Post-checkout confirmation workflow for one page view
pub struct ConfirmationOrchestrator<S> {
    params: RedirectParams,
    store: IntentStore<S>,
    ledger: SubmissionLedger,
    state: WorkflowState,
    /// Set once a request has been handed out. Never cleared.
    sent: bool,
    /// Intent behind the in-flight request
    pending: Option<CheckoutIntent>,
    abandoned: bool,
}

impl<S: KeyValueStorage> ConfirmationOrchestrator<S> {
    pub fn new(params: RedirectParams, store: IntentStore<S>) -> Self {
        Self {
            params,
            store,
            ledger: SubmissionLedger::new(),
            state: WorkflowState::AwaitingIdentity,
            sent: false,
            pending: None,
            abandoned: false,
        }
    }

    /// Share a page-load ledger with other mounts of the same view
    #[must_use]
    pub fn with_ledger(mut self, ledger: SubmissionLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn params(&self) -> &RedirectParams {
        &self.params
    }

    pub fn store(&self) -> &IntentStore<S> {
        &self.store
    }

    /// Whether the single confirmation request has been handed out
    pub fn has_submitted(&self) -> bool {
        self.sent
    }

    /// Feed the latest identity and move as far as the inputs allow.
    ///
    /// Returns [`Transition::Submit`] at most once per subscription across
    /// every orchestrator sharing the ledger, however often it is called.
    pub fn advance(&mut self, identity: &IdentitySnapshot) -> Transition {
        if self.sent || self.abandoned || self.state.is_terminal() {
            return Transition::Idle;
        }

        let Some(user) = identity.user() else {
            return Transition::Idle;
        };

        if self.state == WorkflowState::AwaitingIdentity {
            tracing::debug!(user_id = %user.id, "Identity resolved");
            self.state = WorkflowState::AwaitingIntentMatch;
        }

        let Some((token, subscription_id)) = self.params.confirmation_context() else {
            return Transition::Idle;
        };

        if let Some(prior) = self.ledger.outcome(subscription_id) {
            tracing::debug!(
                subscription_id = %subscription_id,
                "Confirmation already sent during this page load"
            );
            self.sent = true;
            self.state = prior;
            return Transition::Idle;
        }

        let Some(intent) = self.store.read() else {
            tracing::warn!(
                subscription_id = %subscription_id,
                "Payment return without a staged checkout intent"
            );
            self.state = WorkflowState::Failed(CheckoutError::IntentMissing);
            return Transition::Idle;
        };

        if intent.authorization_token != token {
            tracing::warn!(
                redirect_token = %token,
                stored_token = %intent.authorization_token,
                "Checkout intent does not match payment return"
            );
            self.state = WorkflowState::Failed(CheckoutError::IntentMismatch {
                expected: token.to_string(),
                found: intent.authorization_token,
            });
            return Transition::Idle;
        }

        let request = ConfirmationRequest {
            subscription_id: subscription_id.to_string(),
            plan_name: intent.plan_name.clone(),
            authorization_token: intent.authorization_token.clone(),
            user_id: user.id.clone(),
        };

        self.sent = true;
        if !self.ledger.claim(subscription_id) {
            return Transition::Idle;
        }
        self.pending = Some(intent);
        self.state = WorkflowState::Confirming;

        tracing::info!(
            subscription_id = %request.subscription_id,
            plan = %request.plan_name,
            user_id = %request.user_id,
            "Confirming subscription"
        );

        Transition::Submit(request)
    }

    /// Apply the backend's answer to the submitted request.
    ///
    /// Returns the notification to show, if any. Outcomes arriving with no
    /// request in flight, or after [`abandon`](Self::abandon), are dropped.
    pub fn settle(&mut self, outcome: Result<()>) -> Option<Notification> {
        if self.abandoned {
            tracing::debug!("Discarding confirmation outcome for a closed view");
            return None;
        }

        let Some(intent) = self.pending.take() else {
            tracing::warn!("Confirmation outcome without a request in flight");
            return None;
        };

        match outcome {
            Ok(()) => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "Failed to clear checkout intent");
                }
                tracing::info!(plan = %intent.plan_name, "Subscription confirmed");
                self.state = WorkflowState::Succeeded;
                self.record_outcome();

                Some(Notification::success(format!(
                    "You're subscribed to {} ({}/month).",
                    intent.plan_name, intent.price
                )))
            }
            Err(err) => {
                match &err {
                    CheckoutError::ConfirmationRejected(reason) => {
                        tracing::error!(reason = %reason, "Backend rejected subscription confirmation");
                    }
                    CheckoutError::NetworkFailure(reason) => {
                        tracing::error!(reason = %reason, "Subscription confirmation request failed");
                    }
                    other => {
                        tracing::error!(error = %other, "Subscription confirmation failed");
                    }
                }

                let notification = Notification::failure(err.user_message());
                self.state = WorkflowState::Failed(err);
                self.record_outcome();
                Some(notification)
            }
        }
    }

    fn record_outcome(&self) {
        if let Some(subscription_id) = self.params.subscription_id() {
            self.ledger.record(subscription_id, &self.state);
        }
    }

    /// The view is going away; later outcomes are ignored.
    pub fn abandon(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("View closed with confirmation in flight");
        }
        self.abandoned = true;
        self.pending = None;
    }

    /// Advance, send and settle in one go.
    pub async fn run<B, N>(
        &mut self,
        identity: &IdentitySnapshot,
        backend: &B,
        sink: &N,
    ) -> &WorkflowState
    where
        B: ConfirmationBackend + ?Sized,
        N: NotificationSink + ?Sized,
    {
        if let Transition::Submit(request) = self.advance(identity) {
            let outcome = backend.confirm(&request).await;
            if let Some(notification) = self.settle(outcome) {
                sink.notify(&notification);
            }
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserIdentity;
    use crate::intent::MemoryStorage;

    fn signed_in() -> IdentitySnapshot {
        IdentitySnapshot::SignedIn(UserIdentity::new("u1"))
    }

    fn orchestrator(query: &str, staged: Option<CheckoutIntent>) -> ConfirmationOrchestrator<MemoryStorage> {
        let store = IntentStore::new(MemoryStorage::new());
        if let Some(intent) = staged {
            store.write(&intent).unwrap();
        }
        ConfirmationOrchestrator::new(RedirectParams::from_query(query), store)
    }

    #[test]
    fn test_waits_for_identity() {
        let mut orch = orchestrator(
            "ba_token=ABC123&subscription_id=SUB1",
            Some(CheckoutIntent::new("ABC123", "Pro", "$9.99")),
        );

        assert_eq!(orch.advance(&IdentitySnapshot::Loading), Transition::Idle);
        assert_eq!(orch.advance(&IdentitySnapshot::SignedOut), Transition::Idle);
        assert_eq!(orch.state(), &WorkflowState::AwaitingIdentity);
        assert_eq!(orch.state().status(), WorkflowStatus::Idle);
        assert!(!orch.has_submitted());
    }

    #[test]
    fn test_submits_once() {
        let mut orch = orchestrator(
            "ba_token=ABC123&subscription_id=SUB1",
            Some(CheckoutIntent::new("ABC123", "Pro", "$9.99")),
        );

        let Transition::Submit(request) = orch.advance(&signed_in()) else {
            panic!("expected a submission");
        };
        assert_eq!(request.subscription_id, "SUB1");
        assert_eq!(orch.state(), &WorkflowState::Confirming);

        // re-render while in flight
        assert_eq!(orch.advance(&signed_in()), Transition::Idle);
        assert_eq!(orch.advance(&IdentitySnapshot::Loading), Transition::Idle);
        assert!(orch.has_submitted());
    }

    #[test]
    fn test_success_clears_store() {
        let mut orch = orchestrator(
            "ba_token=ABC123&subscription_id=SUB1",
            Some(CheckoutIntent::new("ABC123", "Pro", "$9.99")),
        );
        orch.advance(&signed_in());

        let notification = orch.settle(Ok(())).unwrap();
        assert!(notification.is_success());
        assert!(notification.message.contains("Pro"));
        assert_eq!(orch.state(), &WorkflowState::Succeeded);
        assert!(orch.store().read().is_none());
    }

    #[test]
    fn test_failure_keeps_store() {
        let mut orch = orchestrator(
            "ba_token=ABC123&subscription_id=SUB1",
            Some(CheckoutIntent::new("ABC123", "Pro", "$9.99")),
        );
        orch.advance(&signed_in());

        let notification = orch
            .settle(Err(CheckoutError::NetworkFailure("offline".into())))
            .unwrap();
        assert!(!notification.is_success());
        assert_eq!(orch.state().status(), WorkflowStatus::Failed);
        assert!(orch.store().read().is_some());
        assert_eq!(orch.advance(&signed_in()), Transition::Idle);
    }

    #[test]
    fn test_missing_intent_fails_silently() {
        let mut orch = orchestrator("ba_token=ABC123&subscription_id=SUB1", None);
        assert_eq!(orch.advance(&signed_in()), Transition::Idle);
        assert_eq!(orch.state().failure(), Some(&CheckoutError::IntentMissing));
    }

    #[test]
    fn test_settle_without_submission_is_ignored() {
        let mut orch = orchestrator("", None);
        assert!(orch.settle(Ok(())).is_none());
        assert_eq!(orch.state(), &WorkflowState::AwaitingIdentity);
    }

    #[test]
    fn test_abandon_discards_outcome() {
        let mut orch = orchestrator(
            "ba_token=ABC123&subscription_id=SUB1",
            Some(CheckoutIntent::new("ABC123", "Pro", "$9.99")),
        );
        orch.advance(&signed_in());
        orch.abandon();

        assert!(orch.settle(Ok(())).is_none());
        assert_eq!(orch.state(), &WorkflowState::Confirming);
        assert!(orch.store().read().is_some());
    }

    #[test]
    fn test_shared_ledger_blocks_second_mount() {
        let storage = MemoryStorage::new();
        let ledger = SubmissionLedger::new();
        let store = IntentStore::new(storage.clone());
        store.write(&CheckoutIntent::new("ABC123", "Pro", "$9.99")).unwrap();

        let mount = || {
            ConfirmationOrchestrator::new(
                RedirectParams::from_query("ba_token=ABC123&subscription_id=SUB1"),
                IntentStore::new(storage.clone()),
            )
            .with_ledger(ledger.clone())
        };

        let mut first = mount();
        assert!(matches!(first.advance(&signed_in()), Transition::Submit(_)));
        first.abandon();

        let mut second = mount();
        assert_eq!(second.advance(&signed_in()), Transition::Idle);
        assert!(second.has_submitted());
        assert_eq!(second.state(), &WorkflowState::Confirming);
        assert_eq!(second.advance(&signed_in()), Transition::Idle);
    }
}
