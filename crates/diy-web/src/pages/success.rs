//! Subscription Return Page
//!
//! Landing page for the payment provider's return redirect. Hosts the
//! confirmation orchestrator and renders its status.

use diy_checkout::{
    ConfirmationBackend, ConfirmationOrchestrator, IdentitySnapshot, IntentStore, Notification,
    RedirectParams, SubmissionLedger, Transition, WorkflowStatus,
};
use leptos::logging;
use leptos::prelude::*;
use std::rc::Rc;

use crate::api::{self, HttpConfirmationBackend};
use crate::components::{ConfirmationStatus, Toast};
use crate::config::ClientConfig;
use crate::storage::BrowserStorage;

fn current_redirect_params() -> RedirectParams {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|query| RedirectParams::from_query(&query))
        .unwrap_or_default()
}

#[component]
pub fn SubscriptionSuccessPage() -> impl IntoView {
    let config = ClientConfig::from_env();

    let ledger = use_context::<SubmissionLedger>().unwrap_or_default();
    let orchestrator = StoredValue::new_local(
        ConfirmationOrchestrator::new(
            current_redirect_params(),
            IntentStore::with_key(BrowserStorage, config.intent_key.clone()),
        )
        .with_ledger(ledger),
    );
    let backend = Rc::new(HttpConfirmationBackend::new(&config));

    let (identity, set_identity) = signal(IdentitySnapshot::Loading);
    let (status, set_status) = signal(WorkflowStatus::Idle);
    let (toast, set_toast) = signal(None::<Notification>);

    // Identity resolves on its own schedule; until then the workflow idles.
    let identity_config = config.clone();
    leptos::task::spawn_local(async move {
        match api::fetch_identity(&identity_config).await {
            Ok(snapshot) => {
                set_identity.try_set(snapshot);
            }
            Err(e) => logging::warn!("{e}"),
        }
    });

    Effect::new(move |_| {
        let snapshot = identity.get();
        let Some(transition) = orchestrator.try_update_value(|o| o.advance(&snapshot)) else {
            return;
        };
        if let Some(state) = orchestrator.try_with_value(|o| o.state().status()) {
            set_status.set(state);
        }

        if let Transition::Submit(request) = transition {
            let backend = Rc::clone(&backend);
            leptos::task::spawn_local(async move {
                let outcome = backend.confirm(&request).await;

                // Owner disposed means the user navigated away: drop the outcome.
                let Some(notification) = orchestrator.try_update_value(|o| o.settle(outcome)) else {
                    return;
                };
                if let Some(state) = orchestrator.try_with_value(|o| o.state().status()) {
                    set_status.try_set(state);
                }
                if let Some(notification) = notification {
                    set_toast.try_set(Some(notification));
                }
            });
        }
    });

    on_cleanup(move || {
        orchestrator.try_update_value(|o| o.abandon());
    });

    view! {
        <div class="subscription-success">
            <h1>"Finishing your subscription"</h1>
            <ConfirmationStatus status=status />
            {move || toast.get().map(|notification| view! { <Toast notification=notification /> })}
            <Show when=move || status.get() == WorkflowStatus::Succeeded>
                <a href="/" class="btn btn-primary">"Start a project"</a>
            </Show>
        </div>
    }
}
