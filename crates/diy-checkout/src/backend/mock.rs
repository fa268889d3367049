//! Mock Confirmation Backend
//!
//! For testing and offline demos. Records every request it receives.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{ConfirmationBackend, ConfirmationRequest, ConfirmationResponse};
use crate::error::{CheckoutError, Result};

#[derive(Clone, Debug)]
enum Outcome {
    Accept,
    Reject(String),
    Unreachable(String),
}

/// Mock backend with a fixed outcome
#[derive(Debug)]
pub struct MockConfirmationBackend {
    outcome: Outcome,
    calls: Mutex<Vec<ConfirmationRequest>>,
}

impl Default for MockConfirmationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConfirmationBackend {
    /// Accepts every confirmation
    pub fn new() -> Self {
        Self::with_outcome(Outcome::Accept)
    }

    /// Refuses every confirmation with `message`
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Reject(message.into()))
    }

    /// Fails every confirmation at the transport level
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Unreachable(message.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn calls(&self) -> Vec<ConfirmationRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait(?Send)]
impl ConfirmationBackend for MockConfirmationBackend {
    async fn confirm(&self, request: &ConfirmationRequest) -> Result<()> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        match &self.outcome {
            Outcome::Accept => ConfirmationResponse::accepted().into_result(),
            Outcome::Reject(message) => ConfirmationResponse::rejected(message.clone()).into_result(),
            Outcome::Unreachable(message) => Err(CheckoutError::NetworkFailure(message.clone())),
        }
    }
}
