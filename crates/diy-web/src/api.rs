//! API Client

use async_trait::async_trait;
use diy_checkout::{
    CheckoutError, CheckoutStartRequest, CheckoutStartResponse, ConfirmationBackend,
    ConfirmationRequest, ConfirmationResponse, IdentityResponse, IdentitySnapshot, Plan, Result,
};

use crate::config::ClientConfig;

/// Look up the signed-in user
pub async fn fetch_identity(config: &ClientConfig) -> Result<IdentitySnapshot> {
    let response = reqwest::Client::new()
        .get(config.endpoint("/api/me"))
        .send()
        .await
        .map_err(|e| CheckoutError::IdentityUnavailable(e.to_string()))?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Ok(IdentitySnapshot::SignedOut);
    }
    if !response.status().is_success() {
        return Err(CheckoutError::IdentityUnavailable(format!(
            "identity lookup returned {}",
            response.status()
        )));
    }

    let body: IdentityResponse = response
        .json()
        .await
        .map_err(|e| CheckoutError::IdentityUnavailable(e.to_string()))?;
    Ok(body.into())
}

/// Start a checkout for a paid plan
pub async fn start_checkout(config: &ClientConfig, plan: Plan) -> Result<CheckoutStartResponse> {
    let response = reqwest::Client::new()
        .post(config.endpoint("/api/checkout"))
        .json(&CheckoutStartRequest { plan })
        .send()
        .await
        .map_err(|e| CheckoutError::NetworkFailure(e.to_string()))?;

    if !response.status().is_success() {
        return Err(CheckoutError::NetworkFailure(format!(
            "checkout returned {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| CheckoutError::NetworkFailure(e.to_string()))
}

/// Confirmation backend over HTTP
pub struct HttpConfirmationBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpConfirmationBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint("/api/subscriptions/confirm"),
        }
    }
}

#[async_trait(?Send)]
impl ConfirmationBackend for HttpConfirmationBackend {
    async fn confirm(&self, request: &ConfirmationRequest) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let mut body: ConfirmationResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(CheckoutError::NetworkFailure(e.to_string()));
            }
            Err(_) => ConfirmationResponse::default(),
        };

        if !status.is_success() {
            body.success = false;
        }
        body.into_result()
    }
}
