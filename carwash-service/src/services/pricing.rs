//! Discount arithmetic for a single sale.
//!
//! Amounts are carried as [`Decimal`] so the result is reproducible for a
//! given input. Wire numbers enter through [`PricingInput::from_wire`], which
//! rejects anything outside the accepted ranges before the pure
//! [`compute_pricing`] runs.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingQuote {
    /// Total discount actually computed (percent part plus flat part).
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub discount_label: String,
}

/// Validated pricing inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingInput {
    pub quoted_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
}

impl PricingInput {
    pub fn from_wire(
        quoted_price: f64,
        discount_percent: f64,
        discount_amount: f64,
    ) -> Result<Self, ServiceError> {
        let quoted_price = money_from_f64(quoted_price, "originalPrice")?;
        let discount_percent = money_from_f64(discount_percent, "discountPercent")?;
        let discount_amount = money_from_f64(discount_amount, "discountAmount")?;

        if quoted_price.is_sign_negative() && !quoted_price.is_zero() {
            return Err(ServiceError::validation("originalPrice must be zero or greater"));
        }
        if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
            return Err(ServiceError::validation("discountPercent must be between 0 and 100"));
        }
        if discount_amount.is_sign_negative() && !discount_amount.is_zero() {
            return Err(ServiceError::validation("discountAmount must be zero or greater"));
        }

        Ok(Self {
            quoted_price,
            discount_percent,
            discount_amount,
        })
    }

    pub fn quote(&self) -> PricingQuote {
        compute_pricing(self.quoted_price, self.discount_percent, self.discount_amount)
    }
}

/// Apply a percentage and a flat discount to `quoted_price`.
///
/// The final price is floored at zero; the reported discount is not capped.
pub fn compute_pricing(
    quoted_price: Decimal,
    discount_percent: Decimal,
    discount_amount: Decimal,
) -> PricingQuote {
    let computed = quoted_price * discount_percent / Decimal::ONE_HUNDRED + discount_amount;
    let final_price = (quoted_price - computed).max(Decimal::ZERO);

    PricingQuote {
        discount_amount: round_money(computed),
        final_price: round_money(final_price),
        discount_label: discount_label(discount_percent, discount_amount),
    }
}

pub fn discount_label(discount_percent: Decimal, discount_amount: Decimal) -> String {
    let mut parts = Vec::with_capacity(2);
    if discount_percent > Decimal::ZERO {
        parts.push(format!("{}%", discount_percent.normalize()));
    }
    if discount_amount > Decimal::ZERO {
        parts.push(format!("${} off", discount_amount.normalize()));
    }

    if parts.is_empty() {
        "No discount".to_string()
    } else {
        parts.join(" + ")
    }
}

/// Round half away from zero to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a JSON number through its shortest decimal form, so `0.1` becomes
/// exactly `0.1` rather than the nearest binary fraction.
pub fn money_from_f64(value: f64, field: &str) -> Result<Decimal, ServiceError> {
    if !value.is_finite() {
        return Err(ServiceError::validation(format!("{field} must be a finite number")));
    }

    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .ok_or_else(|| ServiceError::validation(format!("{field} is out of range")))
}

pub fn money_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
