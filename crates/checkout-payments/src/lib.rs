//! # checkout-payments
//!
//! Stripe hosted-checkout session handling for autocheckout.
//!
//! ## Flow
//!
//! All payment logic lives on Stripe's side; this crate is a thin mapping
//! layer around the hosted checkout product:
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │   Client    │────▶│  Stripe Hosted  │────▶│   Client    │
//! │ (checkout)  │     │  Checkout Page  │     │  (receipt)  │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//! ```
//!
//! What this crate actually owns:
//!
//! - **Minor-unit money math** — decimal prices are converted once at the
//!   edge; only integer cents ever reach Stripe.
//! - **Redirect URL composition** — state markers are merged into success and
//!   cancel URLs without clobbering existing query parameters.
//! - **Session-id validation** — provider-issued ids have a fixed shape, and
//!   anything else is rejected before it can be forwarded to a session fetch.
//! - **Webhook verification** — signature checks delegated to the Stripe
//!   library, events classified and acknowledged.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_payments::{CheckoutRequest, StripeClient};
//!
//! let client = StripeClient::new("sk_test_xxx");
//!
//! let session = client.create_checkout_session(CheckoutRequest {
//!     product_name: "Walnut chess set".into(),
//!     currency: stripe::Currency::EUR,
//!     unit_amount_cents: 3500,
//!     quantity: 1,
//!     service_fee_cents: 99,
//!     success_url: "https://example.com/thanks".into(),
//!     cancel_url: "https://example.com/cancel".into(),
//!     locale: None,
//! }).await?;
//!
//! // Redirect the buyer to: session.checkout_url
//! ```

mod checkout;
mod error;
mod money;
mod session_id;
mod urls;
mod webhook;

pub use checkout::{
    parse_currency, AccountInfo, CheckoutRequest, CheckoutSession, LineItemSummary,
    SessionDetails, StripeClient, SERVICE_FEE_ITEM_NAME,
};
pub use error::{CheckoutError, Result};
pub use money::{resolve_service_fee, to_minor_units, CheckoutAmounts};
pub use session_id::{is_valid_session_id, looks_like_placeholder};
pub use urls::{compose_url, restore_session_placeholder, SESSION_ID_PLACEHOLDER};
pub use webhook::{classify, verify_event, WebhookOutcome};

pub use stripe::Currency;
