//! Application State

use std::sync::Arc;

use checkout_payments::StripeClient;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Process-wide configuration, read once at startup
    pub config: Arc<Config>,

    /// Stripe client
    pub stripe: Arc<StripeClient>,
}
