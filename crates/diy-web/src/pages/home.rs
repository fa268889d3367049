//! Home Page

use leptos::prelude::*;

use crate::components::FaqItem;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"diy-assistant"</h1>
                <p class="tagline">"Talk through any home project with an assistant that knows the tools"</p>
                <div class="cta">
                    <a href="/pricing" class="btn btn-primary">"View Plans"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"🔧 Step by step"</h3>
                    <p>"Ask a question, get a plan with parts, tools and order of work."</p>
                </div>
                <div class="feature">
                    <h3>"📷 Show, don't tell"</h3>
                    <p>"Describe what you see and get advice for your exact fixture."</p>
                </div>
                <div class="feature">
                    <h3>"🛑 Knows its limits"</h3>
                    <p>"Flags the jobs that need a licensed professional."</p>
                </div>
            </section>

            <section class="testimonials">
                <blockquote>"Fixed a running toilet in ten minutes." <cite>"Sam, homeowner"</cite></blockquote>
                <blockquote>"Like having a patient contractor on call." <cite>"Priya, first-time renter"</cite></blockquote>
            </section>

            <section class="faq">
                <h2>"FAQ"</h2>
                <FaqItem
                    question="Can I cancel anytime?"
                    answer="Yes. Plans are monthly and can be cancelled from your account."
                />
                <FaqItem
                    question="What happens after I pay?"
                    answer="You come back here and your subscription is activated automatically."
                />
            </section>
        </div>
    }
}
