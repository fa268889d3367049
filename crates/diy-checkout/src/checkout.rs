//! Checkout Staging
//!
//! Plans on offer and the wire types for starting a checkout. Starting a
//! checkout yields the provider approval URL plus the values the client stages
//! as a [`CheckoutIntent`] before navigating away.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CheckoutError;
use crate::intent::CheckoutIntent;

/// Subscription plan tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Team,
}

impl Plan {
    pub const PAID: [Plan; 2] = [Plan::Pro, Plan::Team];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Team => "team",
        }
    }

    /// Name shown to users and sent as `planName`
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Team => "Team",
        }
    }

    /// Display-formatted monthly price
    pub fn price(&self) -> &'static str {
        match self {
            Plan::Free => "$0",
            Plan::Pro => "$9.99",
            Plan::Team => "$24.99",
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Plan::Free)
    }

    /// Look up a plan by display name
    pub fn from_display_name(name: &str) -> Option<Self> {
        [Plan::Free, Plan::Pro, Plan::Team]
            .into_iter()
            .find(|plan| plan.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Plan {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "team" => Ok(Plan::Team),
            other => Err(CheckoutError::UnknownPlan(other.to_string())),
        }
    }
}

/// Body of `POST /api/checkout`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutStartRequest {
    pub plan: Plan,
}

/// Answer to `POST /api/checkout`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStartResponse {
    /// Where to send the user to authorize payment
    pub approval_url: String,

    pub authorization_token: String,
    pub plan_name: String,
    pub price: String,
}

impl CheckoutStartResponse {
    /// The record to stage before following `approval_url`
    pub fn intent(&self) -> CheckoutIntent {
        CheckoutIntent::new(
            self.authorization_token.clone(),
            self.plan_name.clone(),
            self.price.clone(),
        )
    }
}
