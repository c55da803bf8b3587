//! Minor-Unit Money Math
//!
//! All amounts cross the provider boundary as integer minor units (cents);
//! floating point only exists at the request edge and is converted once.

use crate::error::{CheckoutError, Result};

/// Largest unit amount accepted, in minor units. Stripe rejects anything near
/// this long before we do; the cap keeps the f64 -> i64 conversion exact.
const MAX_UNIT_AMOUNT: f64 = 1e12;

/// Convert a decimal price to integer minor units, rounding half away from zero.
pub fn to_minor_units(price: f64) -> Result<i64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CheckoutError::InvalidPrice(format!(
            "price must be a positive number, got {price}"
        )));
    }

    let cents = (price * 100.0).round();
    if cents < 1.0 || cents > MAX_UNIT_AMOUNT {
        return Err(CheckoutError::InvalidPrice(format!(
            "price {price} is out of range"
        )));
    }

    Ok(cents as i64)
}

/// Resolve the service fee: caller override when present, process default
/// otherwise. Negative overrides are a client error.
pub fn resolve_service_fee(override_cents: Option<i64>, default_cents: i64) -> Result<i64> {
    match override_cents {
        Some(fee) if fee < 0 => Err(CheckoutError::InvalidFee(format!(
            "service_fee_cents must be >= 0, got {fee}"
        ))),
        Some(fee) => Ok(fee),
        None => Ok(default_cents),
    }
}

/// Computed amounts for one checkout, all in minor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckoutAmounts {
    pub product_cents: i64,
    pub service_fee_cents: i64,
    pub total_cents: i64,
}

impl CheckoutAmounts {
    pub fn compute(unit_amount_cents: i64, quantity: u64, service_fee_cents: i64) -> Result<Self> {
        let product_cents = i64::try_from(quantity)
            .ok()
            .and_then(|q| unit_amount_cents.checked_mul(q))
            .ok_or_else(|| {
                CheckoutError::InvalidPrice("product amount overflows".to_string())
            })?;
        let total_cents = product_cents.checked_add(service_fee_cents).ok_or_else(|| {
            CheckoutError::InvalidPrice("total amount overflows".to_string())
        })?;

        Ok(Self {
            product_cents,
            service_fee_cents,
            total_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_fractional_prices() {
        assert_eq!(to_minor_units(35.00).unwrap(), 3500);
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(to_minor_units(0.01).unwrap(), 1);
    }

    #[test]
    fn test_rejects_non_positive_and_non_finite() {
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(-3.50).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(f64::INFINITY).is_err());
    }

    #[test]
    fn test_sub_cent_price_rejected() {
        assert!(to_minor_units(0.001).is_err());
    }

    #[test]
    fn test_fee_override_and_default() {
        assert_eq!(resolve_service_fee(Some(150), 99).unwrap(), 150);
        assert_eq!(resolve_service_fee(Some(0), 99).unwrap(), 0);
        assert_eq!(resolve_service_fee(None, 99).unwrap(), 99);
        assert!(resolve_service_fee(Some(-1), 99).is_err());
    }

    #[test]
    fn test_amounts_for_default_fee() {
        let amounts = CheckoutAmounts::compute(3500, 1, 99).unwrap();
        assert_eq!(amounts.product_cents, 3500);
        assert_eq!(amounts.service_fee_cents, 99);
        assert_eq!(amounts.total_cents, 3599);
    }

    #[test]
    fn test_amounts_scale_with_quantity() {
        let amounts = CheckoutAmounts::compute(1999, 3, 0).unwrap();
        assert_eq!(amounts.product_cents, 5997);
        assert_eq!(amounts.total_cents, 5997);
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(CheckoutAmounts::compute(i64::MAX, 2, 0).is_err());
    }
}
