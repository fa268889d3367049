//! Page Components

mod home;
mod pricing;
mod success;

pub use home::HomePage;
pub use pricing::PricingPage;
pub use success::SubscriptionSuccessPage;
