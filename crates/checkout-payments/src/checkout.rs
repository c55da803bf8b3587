//! Stripe Checkout Integration
//!
//! Implements the "Stripe Checkout (Hosted)" approach: session creation and
//! retrieval are delegated to Stripe; this module only maps requests in and
//! results out.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionId, CheckoutSessionLocale,
    CheckoutSessionMode, Client, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    Currency,
};

use crate::error::{CheckoutError, Result};
use crate::session_id::is_valid_session_id;
use crate::urls::{compose_url, restore_session_placeholder, SESSION_ID_PLACEHOLDER};

/// Name of the fixed service-fee line item added to every session.
pub const SERVICE_FEE_ITEM_NAME: &str = "Concierge Service Fee";

const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    http: reqwest::Client,
    secret_key: String,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| CheckoutError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(secret_key.trim()))
    }

    /// Whether the configured secret key is a live-mode key
    pub fn is_live_key(&self) -> bool {
        self.secret_key.starts_with("sk_live_")
    }

    /// Create a hosted checkout session with two line items: the product and
    /// the fixed-name service fee.
    ///
    /// Returns the provider-issued session id and the URL to redirect the
    /// buyer to.
    pub async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let success_url = compose_success_url(&request.success_url)?;
        let cancel_url = compose_cancel_url(&request.cancel_url)?;
        let locale = request.locale.as_deref().and_then(parse_locale);

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(&success_url);
        params.cancel_url = Some(&cancel_url);
        params.locale = locale;
        params.allow_promotion_codes = Some(false);

        params.line_items = Some(vec![
            CreateCheckoutSessionLineItems {
                quantity: Some(request.quantity),
                price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                    currency: request.currency,
                    unit_amount: Some(request.unit_amount_cents),
                    product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                        name: request.product_name.clone(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            CreateCheckoutSessionLineItems {
                quantity: Some(1),
                price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                    currency: request.currency,
                    unit_amount: Some(request.service_fee_cents),
                    product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                        name: SERVICE_FEE_ITEM_NAME.to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        let session_id = session.id.to_string();
        let checkout_url = session.url.ok_or(CheckoutError::MissingCheckoutUrl)?;

        if !is_valid_session_id(&session_id) {
            tracing::error!(session_id = %session_id, "Stripe returned session id outside its own format");
            return Err(CheckoutError::MalformedProviderId);
        }

        tracing::info!(
            session_id = %session_id,
            livemode = session.livemode,
            url_has_fragment = checkout_url.contains('#'),
            "Created checkout session"
        );

        Ok(CheckoutSession {
            id: session_id,
            checkout_url,
            livemode: session.livemode,
        })
    }

    /// Fetch a session back from Stripe with its line items expanded.
    ///
    /// The caller is expected to have validated the id format already; a
    /// structurally invalid id is rejected here as well before any network
    /// call is made.
    pub async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        if !is_valid_session_id(session_id) {
            return Err(CheckoutError::InvalidSessionId);
        }

        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| CheckoutError::InvalidSessionId)?;

        let session = StripeCheckoutSession::retrieve(&self.client, &id, &["line_items"])
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        let line_items = session
            .line_items
            .map(|list| {
                list.data
                    .into_iter()
                    .map(|item| LineItemSummary {
                        description: item.description.unwrap_or_default(),
                        quantity: item.quantity.unwrap_or(1),
                        amount_total_cents: item.amount_total,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(SessionDetails {
            id: session.id.to_string(),
            url: session.url,
            amount_total_cents: session.amount_total,
            currency: session.currency.map(|c| c.to_string().to_uppercase()),
            customer_email: session
                .customer_details
                .and_then(|d| d.email)
                .or(session.customer_email),
            line_items,
        })
    }

    /// Introspect the provider account behind the configured key.
    ///
    /// The typed client has no clean "current account" call, so this goes
    /// through the raw REST endpoint.
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let response = self
            .http
            .get(format!("{STRIPE_API_BASE}/v1/account"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        if !status.is_success() {
            return Err(CheckoutError::Provider(format!("HTTP {status}: {body}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| CheckoutError::Provider(format!("account response: {e}")))
    }
}

fn compose_success_url(base: &str) -> Result<String> {
    let composed = compose_url(
        base,
        &[
            ("session_id", Some(SESSION_ID_PLACEHOLDER)),
            ("status", Some("success")),
        ],
    )?;
    Ok(restore_session_placeholder(&composed))
}

fn compose_cancel_url(base: &str) -> Result<String> {
    compose_url(base, &[("status", Some("cancel"))])
}

/// Map a caller-supplied locale to Stripe's locale set. Unknown values fall
/// back to the provider default rather than failing the checkout.
fn parse_locale(locale: &str) -> Option<CheckoutSessionLocale> {
    let trimmed = locale.trim();
    serde_json::from_value(serde_json::Value::String(trimmed.to_string()))
        .or_else(|_| {
            serde_json::from_value(serde_json::Value::String(trimmed.to_ascii_lowercase()))
        })
        .ok()
}

/// Parse and normalize a 3-letter currency code.
pub fn parse_currency(code: &str) -> Result<Currency> {
    let code = code.trim();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(CheckoutError::InvalidCurrency(code.to_string()));
    }

    Currency::from_str(&code.to_ascii_lowercase())
        .map_err(|_| CheckoutError::InvalidCurrency(code.to_string()))
}

/// Request to create a checkout session, amounts already in minor units
#[derive(Clone, Debug)]
pub struct CheckoutRequest {
    /// Product shown on the hosted page
    pub product_name: String,

    /// Currency for both line items
    pub currency: Currency,

    /// Unit price of the product in minor units
    pub unit_amount_cents: i64,

    /// Quantity to purchase
    pub quantity: u64,

    /// Resolved service fee in minor units
    pub service_fee_cents: i64,

    /// Base URL to send the buyer to after payment
    pub success_url: String,

    /// Base URL to send the buyer to on cancellation
    pub cancel_url: String,

    /// Optional hosted-page locale (e.g. "en", "fr")
    pub locale: Option<String>,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session id
    pub id: String,

    /// URL of the hosted checkout page
    pub checkout_url: String,

    /// Whether the session was created against a live-mode key
    pub livemode: bool,
}

/// Session details queried back on demand for receipts and redirects
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionDetails {
    pub id: String,
    pub url: Option<String>,
    pub amount_total_cents: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub line_items: Vec<LineItemSummary>,
}

/// One purchased line item on a receipt
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineItemSummary {
    pub description: String,
    pub quantity: u64,
    pub amount_total_cents: i64,
}

/// Provider account introspection, for the debug endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_url_carries_placeholder_and_status() {
        let url = compose_success_url("https://chat.openai.com/").unwrap();
        assert!(url.contains("session_id={CHECKOUT_SESSION_ID}"));
        assert!(url.contains("status=success"));
    }

    #[test]
    fn test_cancel_url_carries_only_status() {
        let url = compose_cancel_url("https://x.com/back?b=1").unwrap();
        assert!(url.contains("b=1"));
        assert!(url.contains("status=cancel"));
        assert!(!url.contains("session_id"));
    }

    #[test]
    fn test_parse_currency_normalizes_case() {
        assert_eq!(parse_currency("EUR").unwrap(), Currency::EUR);
        assert_eq!(parse_currency("usd").unwrap(), Currency::USD);
    }

    #[test]
    fn test_parse_currency_rejects_garbage() {
        assert!(parse_currency("").is_err());
        assert!(parse_currency("EURO").is_err());
        assert!(parse_currency("E1R").is_err());
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("en"), Some(CheckoutSessionLocale::En));
        assert_eq!(parse_locale("FR"), Some(CheckoutSessionLocale::Fr));
        assert_eq!(parse_locale("klingon"), None);
    }

    #[test]
    fn test_live_key_detection() {
        assert!(!StripeClient::new("sk_test_abc").is_live_key());
        assert!(StripeClient::new("sk_live_abc").is_live_key());
    }
}
