//! Session-ID Validation
//!
//! Checkout session ids are forwarded to a "retrieve full session" call, so
//! anything a chat or automation client could have synthesized or truncated
//! is rejected before it reaches the provider.

/// Minimum length of the alphanumeric body after the environment prefix.
const MIN_BODY_LEN: usize = 24;

/// Accepts exactly `cs_test_` or `cs_live_` followed by 24+ alphanumerics.
pub fn is_valid_session_id(id: &str) -> bool {
    let body = id
        .strip_prefix("cs_test_")
        .or_else(|| id.strip_prefix("cs_live_"));

    match body {
        Some(body) => body.len() >= MIN_BODY_LEN && body.bytes().all(|b| b.is_ascii_alphanumeric()),
        None => false,
    }
}

/// True when the value is an unsubstituted template token rather than a real
/// session id, e.g. a literal `{CHECKOUT_SESSION_ID}` that the provider never
/// replaced.
pub fn looks_like_placeholder(id: &str) -> bool {
    id.contains('{') || id.contains('}') || id.contains("CHECKOUT_SESSION_ID")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_test_and_live_ids() {
        assert!(is_valid_session_id("cs_test_a1B2c3D4e5F6g7H8i9J0k1L2"));
        assert!(is_valid_session_id("cs_live_a1B2c3D4e5F6g7H8i9J0k1L2m3N4"));
    }

    #[test]
    fn test_rejects_short_body() {
        assert!(!is_valid_session_id("cs_test_abc123"));
    }

    #[test]
    fn test_rejects_foreign_prefix() {
        assert!(!is_valid_session_id("pi_test_a1B2c3D4e5F6g7H8i9J0k1L2"));
        assert!(!is_valid_session_id("cs_prod_a1B2c3D4e5F6g7H8i9J0k1L2"));
    }

    #[test]
    fn test_rejects_empty_and_bare_prefix() {
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id("cs_test_"));
    }

    #[test]
    fn test_rejects_template_braces() {
        assert!(!is_valid_session_id("cs_test_{CHECKOUT_SESSION_ID}"));
        assert!(!is_valid_session_id("{CHECKOUT_SESSION_ID}"));
    }

    #[test]
    fn test_rejects_non_alphanumeric_body() {
        assert!(!is_valid_session_id("cs_test_a1B2c3D4e5F6g7H8i9J0k1L2 "));
        assert!(!is_valid_session_id("cs_test_a1B2c3D4e5F6g7H8i9J0-1L2"));
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(looks_like_placeholder("{CHECKOUT_SESSION_ID}"));
        assert!(looks_like_placeholder("CHECKOUT_SESSION_ID"));
        assert!(looks_like_placeholder("cs_test_{truncated"));
        assert!(!looks_like_placeholder("cs_test_a1B2c3D4e5F6g7H8i9J0k1L2"));
    }
}
