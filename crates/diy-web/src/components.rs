//! UI Components

use diy_checkout::{Notification, NotificationKind, WorkflowStatus};
use leptos::prelude::*;

/// Single-line toast for a terminal outcome
#[component]
pub fn Toast(notification: Notification) -> impl IntoView {
    let class = match notification.kind {
        NotificationKind::Success => "toast toast-success",
        NotificationKind::Failure => "toast toast-error",
    };

    view! {
        <div class=class role="status">{notification.message}</div>
    }
}

/// Status line for the subscription return page
#[component]
pub fn ConfirmationStatus(status: ReadSignal<WorkflowStatus>) -> impl IntoView {
    let text = move || match status.get() {
        WorkflowStatus::Idle => "Checking your account...",
        WorkflowStatus::Matching => "Looking up your checkout...",
        WorkflowStatus::Confirming => "Confirming your subscription...",
        WorkflowStatus::Succeeded => "Your subscription is active.",
        WorkflowStatus::Failed => "We couldn't activate your subscription.",
    };
    let busy = move || {
        matches!(
            status.get(),
            WorkflowStatus::Idle | WorkflowStatus::Matching | WorkflowStatus::Confirming
        )
    };

    view! {
        <div class="confirmation-status">
            <Show when=busy>
                <span class="spinner"></span>
            </Show>
            <p>{text}</p>
        </div>
    }
}

/// Collapsible FAQ entry
#[component]
pub fn FaqItem(question: &'static str, answer: &'static str) -> impl IntoView {
    let (open, set_open) = signal(false);

    view! {
        <div class="faq-item">
            <button class="faq-question" on:click=move |_| set_open.update(|o| *o = !*o)>
                {question}
            </button>
            <Show when=move || open.get()>
                <p class="faq-answer">{answer}</p>
            </Show>
        </div>
    }
}
