use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::PaymentMethod;
use crate::services::pricing::money_from_f64;
use crate::services::{ReceiptInput, ServiceError};
use crate::utils::not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    #[validate(custom(function = "not_blank", message = "customerName is required"))]
    pub customer_name: String,

    #[validate(custom(function = "not_blank", message = "vehicleDetails is required"))]
    pub vehicle_details: String,

    pub email: Option<String>,

    #[serde(alias = "employeeName")]
    pub employee_label: Option<String>,

    #[validate(custom(function = "not_blank", message = "serviceType is required"))]
    pub service_type: String,

    #[serde(alias = "specials")]
    pub specials_label: Option<String>,

    pub payment_method: PaymentMethod,

    #[validate(range(min = 0.0, max = 1000000000.0, message = "originalPrice must be between 0 and 1000000000"))]
    pub original_price: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "discountPercent must be between 0 and 100"))]
    pub discount_percent: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000000000.0, message = "discountAmount must be between 0 and 1000000000"))]
    pub discount_amount: f64,

    #[validate(range(min = 0.0, max = 1000000000.0, message = "finalPrice must be between 0 and 1000000000"))]
    pub final_price: f64,

    pub notes: Option<String>,

    /// Defaults to the time of the request.
    pub issued_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReceiptRequest> for ReceiptInput {
    type Error = ServiceError;

    fn try_from(req: ReceiptRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            original_price: money_from_f64(req.original_price, "originalPrice")?,
            discount_percent: money_from_f64(req.discount_percent, "discountPercent")?,
            discount_amount: money_from_f64(req.discount_amount, "discountAmount")?,
            final_price: money_from_f64(req.final_price, "finalPrice")?,
            customer_name: req.customer_name,
            vehicle_details: req.vehicle_details,
            email: req.email,
            employee_label: req.employee_label,
            service_type: req.service_type,
            specials_label: req.specials_label,
            payment_method: req.payment_method,
            notes: req.notes,
            issued_at: req.issued_at.unwrap_or_else(Utc::now),
        })
    }
}
