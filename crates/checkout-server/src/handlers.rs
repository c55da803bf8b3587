//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use checkout_payments::{
    classify, is_valid_session_id, looks_like_placeholder, parse_currency, resolve_service_fee,
    to_minor_units, verify_event, CheckoutAmounts, CheckoutError, CheckoutRequest, WebhookOutcome,
};

use crate::pages;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub mode: &'static str,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCheckoutBody {
    /// Name of the selected product
    pub product_name: String,

    /// Decimal price, e.g. 35.00
    pub product_price: f64,

    /// Three-letter currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Override fee in minor units; defaults to the configured fee
    #[serde(default)]
    pub service_fee_cents: Option<i64>,

    /// Quantity to purchase
    #[serde(default = "default_quantity")]
    pub quantity: u64,

    /// Redirect base after success; defaults to the configured URL
    #[serde(default)]
    pub success_url: Option<String>,

    /// Redirect base after cancel; defaults to the configured URL
    #[serde(default)]
    pub cancel_url: Option<String>,

    /// Hosted checkout locale (e.g. "en", "fr")
    #[serde(default)]
    pub locale: Option<String>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_quantity() -> u64 {
    1
}

#[derive(Debug, Serialize)]
pub struct CheckoutCreatedResponse {
    /// Provider-hosted checkout page (may contain a URL fragment)
    pub checkout_url: String,

    /// Same-origin short redirect; safe to paste into chat UIs that
    /// truncate fragments
    pub redirect_url: String,

    pub currency: String,
    pub amount_product_cents: i64,
    pub amount_service_fee_cents: i64,
    pub amount_total_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptParams {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelParams {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ErrorResponse {
            error: err.to_string(),
            code,
        }),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            code: 400,
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "autocheckout",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Introspect the provider account behind the configured key
pub async fn debug_account(
    State(state): State<AppState>,
) -> Result<Json<DebugResponse>, ApiError> {
    let account = state.stripe.account_info().await.map_err(error_response)?;

    Ok(Json(DebugResponse {
        mode: if state.stripe.is_live_key() {
            "live"
        } else {
            "test"
        },
        account_id: account.id,
        country: account.country,
    }))
}

/// Create a hosted checkout session
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(body): Json<CreateCheckoutBody>,
) -> Result<Json<CheckoutCreatedResponse>, ApiError> {
    let product_name = body.product_name.trim();
    if product_name.is_empty() {
        return Err(bad_request("product_name must not be empty"));
    }
    if body.quantity == 0 {
        return Err(bad_request("quantity must be >= 1"));
    }

    // Everything below fails before any provider call is made.
    let currency = parse_currency(&body.currency).map_err(error_response)?;
    let unit_amount_cents = to_minor_units(body.product_price).map_err(error_response)?;
    let service_fee_cents =
        resolve_service_fee(body.service_fee_cents, state.config.service_fee_cents)
            .map_err(error_response)?;
    let amounts = CheckoutAmounts::compute(unit_amount_cents, body.quantity, service_fee_cents)
        .map_err(error_response)?;

    let success_url = body
        .success_url
        .unwrap_or_else(|| state.config.success_url.clone());
    let cancel_url = body
        .cancel_url
        .unwrap_or_else(|| state.config.cancel_url.clone());

    let session = state
        .stripe
        .create_checkout_session(CheckoutRequest {
            product_name: product_name.to_string(),
            currency,
            unit_amount_cents,
            quantity: body.quantity,
            service_fee_cents,
            success_url,
            cancel_url,
            locale: body.locale,
        })
        .await
        .map_err(error_response)?;

    Ok(Json(CheckoutCreatedResponse {
        redirect_url: state.config.redirect_url_for(&session.id),
        checkout_url: session.checkout_url,
        currency: currency.to_string().to_uppercase(),
        amount_product_cents: amounts.product_cents,
        amount_service_fee_cents: amounts.service_fee_cents,
        amount_total_cents: amounts.total_cents,
    }))
}

/// Redirect a validated session id to its provider-hosted page
pub async fn redirect_to_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    if !is_valid_session_id(&session_id) {
        return Err(error_response(CheckoutError::InvalidSessionId));
    }

    let details = state
        .stripe
        .retrieve_session(&session_id)
        .await
        .map_err(error_response)?;

    let url = details
        .url
        .ok_or_else(|| error_response(CheckoutError::SessionNotRedirectable))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// Receipt page; best-effort session lookup, degrades to a generic page
pub async fn thanks_page(
    State(state): State<AppState>,
    Query(params): Query<ReceiptParams>,
) -> Html<String> {
    let details = match params.session_id.as_deref() {
        // An unsubstituted template token means the provider never filled in
        // the id; don't forward it.
        Some(id) if !looks_like_placeholder(id) => {
            match state.stripe.retrieve_session(id).await {
                Ok(details) => Some(details),
                Err(e) => {
                    tracing::warn!(error = %e, "Receipt lookup failed; rendering generic page");
                    None
                }
            }
        }
        _ => None,
    };

    tracing::debug!(status = ?params.status, found = details.is_some(), "Rendering receipt page");

    Html(pages::receipt_html(
        details.as_ref(),
        &state.config.return_origin_url,
    ))
}

/// Cancellation page
pub async fn cancel_page(
    State(state): State<AppState>,
    Query(params): Query<CancelParams>,
) -> Html<String> {
    tracing::debug!(status = ?params.status, "Rendering cancel page");

    Html(pages::cancel_html(&state.config.return_origin_url))
}

/// Stripe webhook endpoint
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, ApiError> {
    // Insecure dev mode: without a signing secret every payload is
    // acknowledged, and the response says so.
    let Some(secret) = state.config.webhook_secret.as_deref() else {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set; acknowledging webhook without verification");
        return Ok(Json(WebhookAck {
            received: true,
            warning: Some("No STRIPE_WEBHOOK_SECRET set".into()),
        }));
    };

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let event = verify_event(&body, signature, secret).map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        error_response(e)
    })?;

    match classify(&event) {
        WebhookOutcome::CheckoutCompleted { session_id } => {
            // Fulfillment is out of scope for this service; the event is
            // acknowledged and nothing else happens.
            tracing::info!(session_id = %session_id, "Acknowledged completed checkout");
        }
        WebhookOutcome::Other { event_type } => {
            tracing::debug!(event_type = %event_type, "Acknowledged event without action");
        }
    }

    Ok(Json(WebhookAck {
        received: true,
        warning: None,
    }))
}
