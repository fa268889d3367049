//! Checkout Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout and confirmation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Identity provider never produced a signed-in user
    #[error("Identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// No pending checkout intent was stored (or it was unreadable)
    #[error("No pending checkout intent")]
    IntentMissing,

    /// Stored intent belongs to a different authorization
    #[error("Checkout intent mismatch: redirect token {expected}, stored token {found}")]
    IntentMismatch { expected: String, found: String },

    /// Backend answered but refused the confirmation
    #[error("Confirmation rejected: {0}")]
    ConfirmationRejected(String),

    /// Backend could not be reached or answered garbage
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Key-value storage backend failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Plan identifier not recognised
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
}

impl CheckoutError {
    /// Whether the user should be told about this error.
    ///
    /// Absent or mismatched intents halt the workflow without a notification.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CheckoutError::ConfirmationRejected(_) | CheckoutError::NetworkFailure(_)
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            // Same text for both; the backend's reason only goes to the logs
            CheckoutError::ConfirmationRejected(_) | CheckoutError::NetworkFailure(_) => {
                "We couldn't confirm your subscription. Please contact support.".into()
            }
            CheckoutError::IdentityUnavailable(_) => "Please sign in to finish your purchase.".into(),
            CheckoutError::UnknownPlan(_) => "That plan is not available.".into(),
            _ => "Something went wrong with your checkout.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failures_share_notification_shape() {
        let network = CheckoutError::NetworkFailure("connection reset".into());
        for rejected in [
            CheckoutError::ConfirmationRejected(String::new()),
            CheckoutError::ConfirmationRejected("subscription expired".into()),
        ] {
            assert_eq!(rejected.user_message(), network.user_message());
            assert!(rejected.is_user_facing());
        }
        assert!(network.is_user_facing());
    }

    #[test]
    fn test_backend_reason_stays_in_logs() {
        let err = CheckoutError::ConfirmationRejected("subscription expired".into());
        assert!(!err.user_message().contains("subscription expired"));
        assert!(err.to_string().contains("subscription expired"));
    }

    #[test]
    fn test_correlation_failures_are_silent() {
        let mismatch = CheckoutError::IntentMismatch {
            expected: "ABC123".into(),
            found: "XYZ999".into(),
        };
        assert!(!mismatch.is_user_facing());
        assert!(!CheckoutError::IntentMissing.is_user_facing());
    }
}
