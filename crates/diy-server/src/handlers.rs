//! HTTP Handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use diy_checkout::{
    CheckoutStartRequest, CheckoutStartResponse, ConfirmationRequest, ConfirmationResponse,
    IdentityResponse, SUBSCRIPTION_PARAM, TOKEN_PARAM,
};
use serde::Serialize;
use url::Url;

use crate::registry::{RegistryError, Subscription};
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current identity (development: fixed by `DEV_USER_ID`)
pub async fn current_identity(
    State(state): State<AppState>,
) -> (StatusCode, Json<IdentityResponse>) {
    match &state.config.dev_user_id {
        Some(id) => (StatusCode::OK, Json(IdentityResponse { id: Some(id.clone()) })),
        None => (StatusCode::UNAUTHORIZED, Json(IdentityResponse::default())),
    }
}

/// Subscriptions confirmed for the current identity
pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscription>>, ApiError> {
    let user_id = state.config.dev_user_id.as_deref().ok_or_else(|| {
        api_error(StatusCode::UNAUTHORIZED, "Not signed in", "SIGNED_OUT")
    })?;

    Ok(Json(state.registry.subscriptions_for(user_id)))
}

/// Stage a sandbox checkout.
///
/// The approval URL loops straight back to the return page with the
/// parameters a payment provider would append.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutStartRequest>,
) -> Result<Json<CheckoutStartResponse>, ApiError> {
    let plan = payload.plan;
    if !plan.is_paid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("{plan} plan needs no checkout"),
            "PLAN_NOT_PAID",
        ));
    }

    let (token, subscription_id) = state.registry.stage(plan).map_err(|e| {
        tracing::error!("Checkout staging failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Checkout unavailable", "CHECKOUT_ERROR")
    })?;

    let mut approval_url = Url::parse(&format!(
        "{}/subscription/success",
        state.config.public_origin
    ))
    .map_err(|e| {
        tracing::error!("Invalid PUBLIC_ORIGIN: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Checkout unavailable", "CONFIG_ERROR")
    })?;
    approval_url
        .query_pairs_mut()
        .append_pair(TOKEN_PARAM, &token)
        .append_pair(SUBSCRIPTION_PARAM, &subscription_id);

    Ok(Json(CheckoutStartResponse {
        approval_url: approval_url.to_string(),
        authorization_token: token,
        plan_name: plan.display_name().to_string(),
        price: plan.price().to_string(),
    }))
}

/// Confirm a subscription after payment authorization
pub async fn confirm_subscription(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmationRequest>,
) -> (StatusCode, Json<ConfirmationResponse>) {
    if let Some(dev_user) = &state.config.dev_user_id {
        if dev_user != &payload.user_id {
            tracing::warn!(user_id = %payload.user_id, "Confirmation for another user");
            return (
                StatusCode::FORBIDDEN,
                Json(ConfirmationResponse::rejected("not signed in as this user")),
            );
        }
    }

    match state.registry.confirm(&payload) {
        Ok(_) => (StatusCode::OK, Json(ConfirmationResponse::accepted())),
        Err(e) => {
            let status = match &e {
                RegistryError::AlreadyConfirmed(_) => StatusCode::CONFLICT,
                RegistryError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            };
            tracing::warn!(
                subscription_id = %payload.subscription_id,
                error = ?e,
                "Confirmation rejected"
            );
            (status, Json(ConfirmationResponse::rejected(e.to_string())))
        }
    }
}
