//! # diy-checkout
//!
//! Checkout intent storage and post-checkout subscription confirmation for
//! diy-assistant.
//!
//! ## Checkout round trip
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────────────┐
//! │  Pricing    │────▶│ Payment provider│────▶│ /subscription/success│
//! │ stage intent│     │  authorization  │     │ confirm exactly once │
//! └─────────────┘     └─────────────────┘     └──────────────────────┘
//! ```
//!
//! 1. The pricing page starts a checkout and stages a [`CheckoutIntent`] in an
//!    [`IntentStore`] before following the approval URL.
//! 2. The provider sends the user back with `ba_token` and `subscription_id`
//!    in the query ([`RedirectParams`]).
//! 3. The [`ConfirmationOrchestrator`] waits for the user's identity, checks
//!    the staged intent against `ba_token` and sends one
//!    [`ConfirmationRequest`] through a [`ConfirmationBackend`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diy_checkout::{
//!     ConfirmationOrchestrator, IdentitySnapshot, IntentStore, MemoryStorage,
//!     MockConfirmationBackend, RedirectParams, UserIdentity,
//! };
//!
//! let params = RedirectParams::from_query("?ba_token=ABC123&subscription_id=SUB1");
//! let mut orchestrator = ConfirmationOrchestrator::new(params, IntentStore::new(MemoryStorage::new()));
//!
//! let identity = IdentitySnapshot::SignedIn(UserIdentity::new("u1"));
//! let backend = MockConfirmationBackend::new();
//! orchestrator.run(&identity, &backend, &|n: &_| println!("{n:?}")).await;
//! ```

pub mod backend;
mod checkout;
mod error;
mod identity;
mod intent;
mod ledger;
mod notify;
mod orchestrator;
mod redirect;

pub use backend::{
    ConfirmationBackend, ConfirmationRequest, ConfirmationResponse, MockConfirmationBackend,
};
pub use checkout::{CheckoutStartRequest, CheckoutStartResponse, Plan};
pub use error::{CheckoutError, Result};
pub use identity::{IdentityResponse, IdentitySnapshot, UserIdentity};
pub use intent::{CheckoutIntent, IntentStore, KeyValueStorage, MemoryStorage, DEFAULT_INTENT_KEY};
pub use ledger::SubmissionLedger;
pub use notify::{Notification, NotificationKind, NotificationSink};
pub use orchestrator::{ConfirmationOrchestrator, Transition, WorkflowState, WorkflowStatus};
pub use redirect::{RedirectParams, SUBSCRIPTION_PARAM, TOKEN_PARAM};
