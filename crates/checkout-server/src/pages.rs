//! Static HTML Pages
//!
//! Confirmation and cancellation pages rendered inline. Everything
//! interpolated from provider data goes through `escape_html` first.

use checkout_payments::SessionDetails;

const PAGE_STYLE: &str = "font-family: system-ui, sans-serif; max-width: 36rem; \
     margin: 4rem auto; padding: 0 1rem; color: #1a1a2e;";

/// Escape text for interpolation into HTML body or attribute context.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format minor units as a decimal amount with its currency code.
pub fn format_amount(cents: i64, currency: Option<&str>) -> String {
    let amount = format!("{}.{:02}", cents / 100, (cents % 100).abs());
    match currency {
        Some(code) => format!("{amount} {code}"),
        None => amount,
    }
}

/// Receipt page. `details` is best-effort: `None` renders a generic
/// confirmation without any per-session data.
pub fn receipt_html(details: Option<&SessionDetails>, return_url: &str) -> String {
    let body = match details {
        Some(details) => {
            let mut items = String::new();
            for item in &details.line_items {
                items.push_str(&format!(
                    "<li>{} × {} — {}</li>",
                    escape_html(&item.description),
                    item.quantity,
                    format_amount(item.amount_total_cents, details.currency.as_deref()),
                ));
            }

            let total = details
                .amount_total_cents
                .map(|cents| {
                    format!(
                        "<p><strong>Total: {}</strong></p>",
                        format_amount(cents, details.currency.as_deref())
                    )
                })
                .unwrap_or_default();

            let email = details
                .customer_email
                .as_deref()
                .map(|email| {
                    format!(
                        "<p>A receipt was sent to <strong>{}</strong>.</p>",
                        escape_html(email)
                    )
                })
                .unwrap_or_default();

            format!("<ul>{items}</ul>{total}{email}")
        }
        None => "<p>Your payment was processed.</p>".to_string(),
    };

    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Payment received</title></head>\n\
         <body style=\"{PAGE_STYLE}\">\n\
         <h1>Payment received</h1>\n\
         <p>Thank you for your purchase.</p>\n\
         {body}\n\
         <p><a href=\"{}\">Back to the app</a></p>\n\
         </body>\n</html>\n",
        escape_html(return_url),
    )
}

/// Cancellation page. Nothing was charged.
pub fn cancel_html(return_url: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Checkout cancelled</title></head>\n\
         <body style=\"{PAGE_STYLE}\">\n\
         <h1>Checkout cancelled</h1>\n\
         <p>Your payment was cancelled. You have not been charged.</p>\n\
         <p><a href=\"{}\">Back to the app</a></p>\n\
         </body>\n</html>\n",
        escape_html(return_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_payments::LineItemSummary;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3599, Some("EUR")), "35.99 EUR");
        assert_eq!(format_amount(99, Some("EUR")), "0.99 EUR");
        assert_eq!(format_amount(3500, None), "35.00");
    }

    #[test]
    fn test_generic_receipt() {
        let html = receipt_html(None, "https://chat.openai.com/");
        assert!(html.contains("Payment received"));
        assert!(html.contains("Your payment was processed."));
    }

    #[test]
    fn test_receipt_escapes_provider_text() {
        let details = SessionDetails {
            id: "cs_test_a1B2c3D4e5F6g7H8i9J0k1L2".into(),
            url: None,
            amount_total_cents: Some(3599),
            currency: Some("EUR".into()),
            customer_email: Some("<script>x</script>@example.com".into()),
            line_items: vec![LineItemSummary {
                description: "Chess set <deluxe>".into(),
                quantity: 1,
                amount_total_cents: 3500,
            }],
        };

        let html = receipt_html(Some(&details), "https://chat.openai.com/");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Chess set &lt;deluxe&gt;"));
        assert!(html.contains("35.99 EUR"));
    }

    #[test]
    fn test_cancel_page() {
        let html = cancel_html("https://chat.openai.com/");
        assert!(html.contains("Checkout cancelled"));
        assert!(html.contains("not been charged"));
    }
}
