//! Pricing Page

use diy_checkout::{IntentStore, Plan};
use leptos::logging;
use leptos::prelude::*;

use crate::api;
use crate::config::ClientConfig;
use crate::storage::BrowserStorage;

/// Start a checkout, stage the intent, then leave for the payment provider
async fn begin_checkout(plan: Plan) -> Result<(), String> {
    let config = ClientConfig::from_env();
    let checkout = api::start_checkout(&config, plan)
        .await
        .map_err(|e| e.user_message())?;

    IntentStore::with_key(BrowserStorage, config.intent_key.clone())
        .write(&checkout.intent())
        .map_err(|e| {
            logging::error!("Could not stage checkout intent: {e}");
            e.user_message()
        })?;

    web_sys::window()
        .ok_or_else(|| "No browser window".to_string())?
        .location()
        .set_href(&checkout.approval_url)
        .map_err(|e| format!("{e:?}"))
}

#[component]
pub fn PricingPage() -> impl IntoView {
    let (error, set_error) = signal(None::<String>);
    let (pending, set_pending) = signal(false);

    let checkout = move |plan: Plan| {
        if pending.get() {
            return;
        }
        set_pending.set(true);
        set_error.set(None);

        leptos::task::spawn_local(async move {
            if let Err(e) = begin_checkout(plan).await {
                logging::warn!("Checkout for {plan} failed: {e}");
                set_error.try_set(Some(e));
                set_pending.try_set(false);
            }
        });
    };

    view! {
        <div class="pricing">
            <h1>"Pricing"</h1>
            <p class="subtitle">"Pick the help you need"</p>

            <Show when=move || error.get().is_some()>
                <div class="toast toast-error">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <div class="plans">
                <div class="plan">
                    <h2>{Plan::Free.display_name()}</h2>
                    <div class="price">{Plan::Free.price()}<span>"/month"</span></div>
                    <ul>
                        <li>"10 questions/day"</li>
                        <li>"Text answers"</li>
                    </ul>
                    <a href="/" class="btn">"Get Started"</a>
                </div>

                <div class="plan featured">
                    <span class="badge">"Popular"</span>
                    <h2>{Plan::Pro.display_name()}</h2>
                    <div class="price">{Plan::Pro.price()}<span>"/month"</span></div>
                    <ul>
                        <li>"Unlimited questions"</li>
                        <li>"Photo troubleshooting"</li>
                        <li>"Project history"</li>
                    </ul>
                    <button
                        class="btn btn-primary"
                        disabled=move || pending.get()
                        on:click=move |_| checkout(Plan::Pro)
                    >
                        "Subscribe"
                    </button>
                </div>

                <div class="plan">
                    <h2>{Plan::Team.display_name()}</h2>
                    <div class="price">{Plan::Team.price()}<span>"/month"</span></div>
                    <ul>
                        <li>"Everything in Pro"</li>
                        <li>"5 seats"</li>
                        <li>"Shared projects"</li>
                    </ul>
                    <button
                        class="btn"
                        disabled=move || pending.get()
                        on:click=move |_| checkout(Plan::Team)
                    >
                        "Subscribe"
                    </button>
                </div>
            </div>
        </div>
    }
}
