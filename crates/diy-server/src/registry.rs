//! Subscription Registry
//!
//! In-memory record of staged checkouts and confirmed subscriptions. The
//! registry is the authority on duplicates: a subscription ID confirms once,
//! whichever tab or client sends it.

use chrono::{DateTime, Utc};
use diy_checkout::{ConfirmationRequest, Plan};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Registry errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("subscription {0} already confirmed")]
    AlreadyConfirmed(String),

    #[error("unknown authorization token {0}")]
    UnknownToken(String),

    #[error("authorization does not belong to this subscription")]
    SubscriptionMismatch,

    #[error("plan does not match checkout")]
    PlanMismatch,

    #[error("registry unavailable")]
    Poisoned,
}

/// A checkout awaiting payment authorization
#[derive(Clone, Debug)]
pub struct StagedCheckout {
    pub plan: Plan,
    pub subscription_id: String,
    pub created_at: DateTime<Utc>,
}

/// A confirmed subscription
#[derive(Clone, Debug, Serialize)]
pub struct Subscription {
    pub subscription_id: String,
    pub user_id: String,
    pub plan: Plan,
    pub confirmed_at: DateTime<Utc>,
}

/// Sandbox identifiers (formatted: PREFIX-XXXXXXXXXXXX)
fn sandbox_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &hex[..12])
}

#[derive(Default)]
pub struct SubscriptionRegistry {
    /// Keyed by authorization token
    staged: RwLock<HashMap<String, StagedCheckout>>,
    /// Keyed by subscription ID
    confirmed: RwLock<HashMap<String, Subscription>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a checkout; returns `(authorization_token, subscription_id)`
    pub fn stage(&self, plan: Plan) -> Result<(String, String), RegistryError> {
        let token = sandbox_id("BA");
        let subscription_id = sandbox_id("I");

        let mut staged = self.staged.write().map_err(|_| RegistryError::Poisoned)?;
        staged.insert(
            token.clone(),
            StagedCheckout {
                plan,
                subscription_id: subscription_id.clone(),
                created_at: Utc::now(),
            },
        );

        tracing::info!(plan = %plan, subscription_id = %subscription_id, "Staged checkout");
        Ok((token, subscription_id))
    }

    /// Confirm a staged checkout for a user
    pub fn confirm(&self, request: &ConfirmationRequest) -> Result<Subscription, RegistryError> {
        let mut confirmed = self.confirmed.write().map_err(|_| RegistryError::Poisoned)?;

        if confirmed.contains_key(&request.subscription_id) {
            return Err(RegistryError::AlreadyConfirmed(request.subscription_id.clone()));
        }

        let mut staged = self.staged.write().map_err(|_| RegistryError::Poisoned)?;
        let checkout = staged
            .get(&request.authorization_token)
            .ok_or_else(|| RegistryError::UnknownToken(request.authorization_token.clone()))?;

        if checkout.subscription_id != request.subscription_id {
            return Err(RegistryError::SubscriptionMismatch);
        }
        if !checkout.plan.display_name().eq_ignore_ascii_case(&request.plan_name) {
            return Err(RegistryError::PlanMismatch);
        }

        let staged_at = checkout.created_at;
        let subscription = Subscription {
            subscription_id: request.subscription_id.clone(),
            user_id: request.user_id.clone(),
            plan: checkout.plan,
            confirmed_at: Utc::now(),
        };
        staged.remove(&request.authorization_token);
        confirmed.insert(subscription.subscription_id.clone(), subscription.clone());

        tracing::info!(
            subscription_id = %subscription.subscription_id,
            user_id = %subscription.user_id,
            plan = %subscription.plan,
            staged_for_secs = (subscription.confirmed_at - staged_at).num_seconds(),
            "Subscription confirmed"
        );
        Ok(subscription)
    }

    /// Confirmed subscriptions for a user
    pub fn subscriptions_for(&self, user_id: &str) -> Vec<Subscription> {
        self.confirmed
            .read()
            .map(|confirmed| {
                confirmed
                    .values()
                    .filter(|s| s.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(token: &str, subscription_id: &str) -> ConfirmationRequest {
        ConfirmationRequest {
            subscription_id: subscription_id.into(),
            plan_name: "Pro".into(),
            authorization_token: token.into(),
            user_id: "u1".into(),
        }
    }

    #[test]
    fn test_sandbox_id_format() {
        let id = sandbox_id("BA");
        assert!(id.starts_with("BA-"));
        assert_eq!(id.len(), 15);
    }

    #[test]
    fn test_confirm_staged_checkout() {
        let registry = SubscriptionRegistry::new();
        let (token, sub) = registry.stage(Plan::Pro).unwrap();

        let subscription = registry.confirm(&request(&token, &sub)).unwrap();
        assert_eq!(subscription.plan, Plan::Pro);
        assert_eq!(registry.subscriptions_for("u1").len(), 1);
    }

    #[test]
    fn test_duplicate_subscription_rejected() {
        let registry = SubscriptionRegistry::new();
        let (token, sub) = registry.stage(Plan::Pro).unwrap();

        registry.confirm(&request(&token, &sub)).unwrap();
        assert_eq!(
            registry.confirm(&request(&token, &sub)).unwrap_err(),
            RegistryError::AlreadyConfirmed(sub)
        );
    }

    #[test]
    fn test_confirm_consumes_staged_token() {
        let registry = SubscriptionRegistry::new();
        let (token, sub) = registry.stage(Plan::Pro).unwrap();
        registry.stage(Plan::Team).unwrap();

        registry.confirm(&request(&token, &sub)).unwrap();
        let staged = registry.staged.read().unwrap();
        assert_eq!(staged.len(), 1);
        assert!(!staged.contains_key(&token));
    }

    #[test]
    fn test_unknown_token_rejected() {
        let registry = SubscriptionRegistry::new();
        let err = registry.confirm(&request("BA-NOPE", "I-NOPE")).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownToken(_)));
    }

    #[test]
    fn test_token_bound_to_subscription() {
        let registry = SubscriptionRegistry::new();
        let (token, _) = registry.stage(Plan::Pro).unwrap();
        let (_, other_sub) = registry.stage(Plan::Pro).unwrap();

        assert_eq!(
            registry.confirm(&request(&token, &other_sub)).unwrap_err(),
            RegistryError::SubscriptionMismatch
        );
    }
}
