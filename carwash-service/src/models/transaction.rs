use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ActorRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "Mobile Payment")]
    MobilePayment,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobilePayment => "Mobile Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded sale. Pricing fields are written once at creation and never
/// recomputed: `final_price = max(0, quoted_price - total_discount)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_type: String,
    pub quoted_price: f64,
    pub final_price: f64,
    pub discount_percent: f64,
    /// Flat discount as entered, not the computed total.
    pub discount_amount: f64,
    pub total_discount: f64,
    pub discount_label: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub service_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub vehicle_details: String,
    pub customer_name: String,
    pub notes: Option<String>,
    pub specials: Option<String>,
    pub customer_id: String,
    pub created_by: ActorRef,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&PaymentMethod::MobilePayment).unwrap();
        assert_eq!(json, r#""Mobile Payment""#);

        let parsed: PaymentMethod = serde_json::from_str(r#""Card""#).unwrap();
        assert_eq!(parsed, PaymentMethod::Card);

        assert!(serde_json::from_str::<PaymentMethod>(r#""Cheque""#).is_err());
    }
}
