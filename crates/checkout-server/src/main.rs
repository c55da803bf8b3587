//! autocheckout HTTP Server
//!
//! Axum-based server around Stripe's hosted checkout: session creation,
//! short redirect links, receipt pages, and webhook acknowledgment.

mod config;
mod handlers;
mod pages;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_payments::StripeClient;

use crate::config::Config;
use crate::handlers::{
    cancel_page, create_checkout, debug_account, health_check, redirect_to_session,
    stripe_webhook, thanks_page,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Configuration is read once; a missing Stripe key is fatal here.
    let config = Arc::new(Config::from_env()?);
    let stripe = Arc::new(StripeClient::new(&config.stripe_secret_key));

    if stripe.is_live_key() {
        tracing::warn!("⚠ Live-mode Stripe key configured - sessions will charge real cards");
    } else {
        tracing::info!("✓ Test-mode Stripe key configured");
    }

    if config.webhook_secret.is_some() {
        tracing::info!("✓ Webhook signature verification enabled");
    } else {
        tracing::warn!("⚠ STRIPE_WEBHOOK_SECRET not set - webhooks acknowledged unverified");
    }

    let state = AppState {
        config: config.clone(),
        stripe,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & introspection
        .route("/", get(health_check))
        .route("/debug", get(debug_account))
        // Checkout flow
        .route("/create_checkout", post(create_checkout))
        .route("/r/{session_id}", get(redirect_to_session))
        // Buyer-facing pages
        .route("/thanks", get(thanks_page))
        .route("/cancel", get(cancel_page))
        // Provider callbacks
        .route("/webhook", post(stripe_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("autocheckout running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                - Health check");
    tracing::info!("  GET  /debug           - Provider account introspection");
    tracing::info!("  POST /create_checkout - Create hosted checkout session");
    tracing::info!("  GET  /r/{{session_id}}  - Redirect to hosted page");
    tracing::info!("  GET  /thanks          - Receipt page");
    tracing::info!("  GET  /cancel          - Cancellation page");
    tracing::info!("  POST /webhook         - Stripe webhook");

    axum::serve(listener, app).await?;

    Ok(())
}
