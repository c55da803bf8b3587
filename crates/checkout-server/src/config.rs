//! Process Configuration
//!
//! Read once at startup and treated as immutable for the process lifetime;
//! handlers see it through `AppState` rather than ambient globals.

use anyhow::{bail, Context};

/// Default service fee in minor units (€0.99).
pub const DEFAULT_SERVICE_FEE_CENTS: i64 = 99;

/// Where buyers land when no redirect URL is supplied: back to the chat app
/// that initiated the purchase.
const DEFAULT_RETURN_URL: &str = "https://chat.openai.com/";

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Immutable process-wide configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Stripe secret key; startup-fatal when absent
    pub stripe_secret_key: String,

    /// Default service fee in minor units, applied when the caller sends none
    pub service_fee_cents: i64,

    /// Default success redirect base URL
    pub success_url: String,

    /// Default cancel redirect base URL
    pub cancel_url: String,

    /// "Back to the app" link target on rendered pages
    pub return_origin_url: String,

    /// Public origin used to mint short `/r/{id}` redirect URLs
    pub public_base_url: String,

    /// Webhook signing secret; `None` means insecure dev mode
    pub webhook_secret: Option<String>,

    /// Listen address
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let stripe_secret_key = non_empty(std::env::var("STRIPE_SECRET_KEY").ok())
            .context("Missing STRIPE_SECRET_KEY environment variable")?;

        let service_fee_cents = parse_fee(std::env::var("SERVICE_FEE_CENTS").ok().as_deref())?;

        let success_url = non_empty(std::env::var("CHECKOUT_SUCCESS_URL").ok())
            .unwrap_or_else(|| DEFAULT_RETURN_URL.to_string());
        let cancel_url = non_empty(std::env::var("CHECKOUT_CANCEL_URL").ok())
            .unwrap_or_else(|| DEFAULT_RETURN_URL.to_string());
        let return_origin_url = non_empty(std::env::var("RETURN_ORIGIN_URL").ok())
            .unwrap_or_else(|| DEFAULT_RETURN_URL.to_string());
        let public_base_url = non_empty(std::env::var("PUBLIC_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string());

        let webhook_secret = non_empty(std::env::var("STRIPE_WEBHOOK_SECRET").ok());

        let bind_addr = non_empty(std::env::var("BIND_ADDR").ok())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            stripe_secret_key,
            service_fee_cents,
            success_url,
            cancel_url,
            return_origin_url,
            public_base_url,
            webhook_secret,
            bind_addr,
        })
    }

    /// Short same-origin redirect URL for a session id.
    pub fn redirect_url_for(&self, session_id: &str) -> String {
        format!(
            "{}/r/{}",
            self.public_base_url.trim_end_matches('/'),
            session_id
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_fee(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_SERVICE_FEE_CENTS);
    };

    let fee: i64 = raw
        .parse()
        .with_context(|| format!("SERVICE_FEE_CENTS is not an integer: {raw:?}"))?;
    if fee < 0 {
        bail!("SERVICE_FEE_CENTS must be >= 0, got {fee}");
    }

    Ok(fee)
}
