//! Checkout Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout-related errors
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Price could not be converted to integer minor units
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Service fee override was negative
    #[error("Invalid service fee: {0}")]
    InvalidFee(String),

    /// Currency code not recognized by the provider
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Session id does not match the provider's id format
    #[error("Invalid session id")]
    InvalidSessionId,

    /// Redirect base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Stripe API error
    #[error("Stripe error: {0}")]
    Provider(String),

    /// Session created but Stripe returned no hosted checkout URL
    #[error("Stripe did not return a checkout URL")]
    MissingCheckoutUrl,

    /// Session created but Stripe returned an id outside its own format
    #[error("Stripe returned a malformed session id")]
    MalformedProviderId,

    /// Session exists but has no hosted URL to redirect to
    #[error("Session has no hosted checkout URL")]
    SessionNotRedirectable,

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// HTTP status code this error surfaces as
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::InvalidPrice(_)
            | CheckoutError::InvalidFee(_)
            | CheckoutError::InvalidCurrency(_)
            | CheckoutError::InvalidSessionId
            | CheckoutError::InvalidUrl(_)
            | CheckoutError::Provider(_)
            | CheckoutError::WebhookSignature(_) => 400,
            CheckoutError::SessionNotRedirectable => 404,
            CheckoutError::MissingCheckoutUrl
            | CheckoutError::MalformedProviderId
            | CheckoutError::Config(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::InvalidPrice("x".into()).status_code(), 400);
        assert_eq!(CheckoutError::Provider("x".into()).status_code(), 400);
        assert_eq!(CheckoutError::SessionNotRedirectable.status_code(), 404);
        assert_eq!(CheckoutError::MissingCheckoutUrl.status_code(), 500);
    }
}
