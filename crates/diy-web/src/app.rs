//! Main App Component

use diy_checkout::SubmissionLedger;
use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{HomePage, PricingPage, SubscriptionSuccessPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Outlives route changes: one confirmation per subscription per page load
    provide_context(SubmissionLedger::new());

    view! {
        <Router>
            <nav class="nav">
                <a href="/" class="brand">"diy-assistant"</a>
                <a href="/pricing">"Pricing"</a>
            </nav>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/pricing") view=PricingPage />
                    <Route path=path!("/subscription/success") view=SubscriptionSuccessPage />
                </Routes>
            </main>
        </Router>
    }
}
