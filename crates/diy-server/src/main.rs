//! diy-assistant HTTP Server
//!
//! Axum-based development server: serves the WASM frontend and the identity,
//! checkout and subscription-confirmation endpoints it calls.

mod config;
mod handlers;
mod registry;
mod state;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::handlers::{
    confirm_subscription, create_checkout, current_identity, health_check, list_subscriptions,
};
use crate::state::AppState;

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/me", get(current_identity))

        // Subscriptions
        .route("/api/checkout", post(create_checkout))
        .route("/api/subscriptions", get(list_subscriptions))
        .route("/api/subscriptions/confirm", post(confirm_subscription))

        // Static files (WASM frontend)
        .fallback_service(
            tower_http::services::ServeDir::new(&static_dir)
                .fallback(tower_http::services::ServeFile::new(format!("{static_dir}/index.html"))),
        )

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    match &config.dev_user_id {
        Some(id) => tracing::info!("✓ Signed in as {}", id),
        None => {
            tracing::warn!("⚠ No DEV_USER_ID - /api/me reports signed out");
            tracing::warn!("  Subscriptions cannot be confirmed until it is set in .env");
        }
    }

    let addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 diy-assistant server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                   - Health check");
    tracing::info!("  GET  /api/me                   - Current identity");
    tracing::info!("  POST /api/checkout             - Stage a checkout");
    tracing::info!("  GET  /api/subscriptions        - Subscriptions for current user");
    tracing::info!("  POST /api/subscriptions/confirm - Confirm a subscription");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use diy_checkout::{CheckoutStartResponse, ConfirmationResponse, RedirectParams};
    use tower::ServiceExt;

    fn app(dev_user_id: Option<&str>) -> Router {
        build_router(AppState::new(ServerConfig {
            dev_user_id: dev_user_id.map(str::to_string),
            ..ServerConfig::default()
        }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn start_checkout(app: &Router) -> CheckoutStartResponse {
        let response = app
            .clone()
            .oneshot(post_json("/api/checkout", serde_json::json!({ "plan": "pro" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json(response).await
    }

    fn confirm_body(checkout: &CheckoutStartResponse, user_id: &str) -> serde_json::Value {
        let params = RedirectParams::from_url(&checkout.approval_url).unwrap();
        serde_json::json!({
            "subscriptionId": params.subscription_id().unwrap(),
            "planName": checkout.plan_name,
            "authorizationToken": params.authorization_token().unwrap(),
            "userId": user_id,
        })
    }

    #[tokio::test]
    async fn test_identity_signed_out() {
        let response = app(None)
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_checkout_approval_url_carries_redirect_params() {
        let checkout = start_checkout(&app(Some("u1"))).await;
        let params = RedirectParams::from_url(&checkout.approval_url).unwrap();

        assert_eq!(params.authorization_token(), Some(checkout.authorization_token.as_str()));
        assert!(params.subscription_id().is_some());
        assert_eq!(checkout.plan_name, "Pro");
        assert_eq!(checkout.price, "$9.99");
    }

    #[tokio::test]
    async fn test_free_plan_has_no_checkout() {
        let response = app(Some("u1"))
            .oneshot(post_json("/api/checkout", serde_json::json!({ "plan": "free" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_confirmation_conflicts() {
        let app = app(Some("u1"));
        let checkout = start_checkout(&app).await;

        let first = app
            .clone()
            .oneshot(post_json("/api/subscriptions/confirm", confirm_body(&checkout, "u1")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert!(json::<ConfirmationResponse>(first).await.success);

        let listed = app
            .clone()
            .oneshot(Request::get("/api/subscriptions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let subscriptions: Vec<serde_json::Value> = json(listed).await;
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0]["plan"], "pro");

        let second = app
            .oneshot(post_json("/api/subscriptions/confirm", confirm_body(&checkout, "u1")))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body: ConfirmationResponse = json(second).await;
        assert!(!body.success);
        assert!(body.message.unwrap().ends_with("already confirmed"));
    }

    #[tokio::test]
    async fn test_confirmation_for_other_user_forbidden() {
        let app = app(Some("u1"));
        let checkout = start_checkout(&app).await;

        let response = app
            .oneshot(post_json("/api/subscriptions/confirm", confirm_body(&checkout, "u2")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
