//! Stripe Webhook Handling
//!
//! Signature verification is delegated to the Stripe library; events are
//! classified and acknowledged. Fulfillment is intentionally not implemented
//! here.

use stripe::{Event, EventObject, EventType, Webhook};

use crate::error::{CheckoutError, Result};

/// Classified webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A hosted checkout session finished payment
    CheckoutCompleted { session_id: String },

    /// Any other event type; acknowledged without action
    Other { event_type: String },
}

/// Verify the signature header against the shared secret and parse the event.
pub fn verify_event(payload: &str, signature: &str, secret: &str) -> Result<Event> {
    Webhook::construct_event(payload, signature, secret)
        .map_err(|e| CheckoutError::WebhookSignature(e.to_string()))
}

/// Classify a verified event. Every event is acknowledged; only
/// `checkout.session.completed` is recognized as meaningful, and even that
/// carries no fulfillment action (out of scope for this service).
pub fn classify(event: &Event) -> WebhookOutcome {
    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = &event.data.object {
                tracing::info!(
                    session_id = %session.id,
                    livemode = event.livemode,
                    "Checkout session completed"
                );
                WebhookOutcome::CheckoutCompleted {
                    session_id: session.id.to_string(),
                }
            } else {
                tracing::warn!("checkout.session.completed event without a session object");
                WebhookOutcome::Other {
                    event_type: format!("{:?}", event.type_),
                }
            }
        }
        _ => {
            tracing::debug!(event_type = ?event.type_, "Unhandled webhook event");
            WebhookOutcome::Other {
                event_type: format!("{:?}", event.type_),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // Builds a `Stripe-Signature` header the way Stripe does: HMAC-SHA256
    // over "<timestamp>.<payload>" with the shared secret.
    fn sign(payload: &str, secret: &str, timestamp: i64) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.{payload}").as_bytes());
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = r#"{"type":"checkout.session.completed"}"#;
        let header = sign(payload, "whsec_wrong", chrono::Utc::now().timestamp());
        assert!(verify_event(payload, &header, "whsec_right").is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = r#"{"type":"checkout.session.completed"}"#;
        let header = sign(payload, "whsec_x", chrono::Utc::now().timestamp());
        let tampered = r#"{"type":"checkout.session.completed","amount":0}"#;
        assert!(verify_event(tampered, &header, "whsec_x").is_err());
    }

    #[test]
    fn test_garbage_header_rejected() {
        assert!(verify_event("{}", "not-a-signature", "whsec_x").is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = "{}";
        let header = sign(payload, "whsec_x", chrono::Utc::now().timestamp() - 3600);
        assert!(verify_event(payload, &header, "whsec_x").is_err());
    }
}
