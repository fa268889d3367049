//! Confirmation Backend
//!
//! The single request that finalizes a subscription once the payment
//! provider has handed control back.

mod mock;

pub use mock::MockConfirmationBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};

/// Fallback reason when the backend refuses without saying why
pub const DEFAULT_REJECTION: &str = "Subscription confirmation failed";

/// Body of `POST /api/subscriptions/confirm`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub subscription_id: String,
    pub plan_name: String,
    pub authorization_token: String,
    pub user_id: String,
}

/// Backend answer to a confirmation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConfirmationResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Collapse into the workflow's error model
    pub fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(CheckoutError::ConfirmationRejected(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            ))
        }
    }
}

/// Confirmation backend (Strategy pattern)
///
/// Implementations return [`CheckoutError::ConfirmationRejected`] when the
/// backend refuses and [`CheckoutError::NetworkFailure`] when it cannot be
/// reached. Browser HTTP futures are not `Send`.
#[async_trait(?Send)]
pub trait ConfirmationBackend {
    /// Confirm a subscription
    async fn confirm(&self, request: &ConfirmationRequest) -> Result<()>;
}
