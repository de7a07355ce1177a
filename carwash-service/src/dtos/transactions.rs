use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::customers::CustomerResponse;
use crate::models::{ActorKind, PaymentMethod, Transaction};
use crate::services::{CreatorSummary, EnrichedTransaction, NewTransaction, TransactionFilter};
use crate::utils::not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[validate(custom(function = "not_blank", message = "serviceType is required"))]
    pub service_type: String,

    /// Pre-discount price as entered.
    #[validate(range(min = 0.0, max = 1000000000.0, message = "originalPrice must be between 0 and 1000000000"))]
    pub original_price: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "discountPercent must be between 0 and 100"))]
    pub discount_percent: Option<f64>,

    #[validate(range(min = 0.0, max = 1000000000.0, message = "discountAmount must be between 0 and 1000000000"))]
    pub discount_amount: Option<f64>,

    pub payment_method: PaymentMethod,

    #[validate(custom(function = "not_blank", message = "vehicleDetails is required"))]
    pub vehicle_details: String,

    #[validate(custom(function = "not_blank", message = "customerName is required"))]
    pub customer_name: String,

    /// Accepted for compatibility; the customer record is not changed.
    pub email: Option<String>,

    pub specials: Option<String>,

    pub notes: Option<String>,

    pub customer: Option<String>,

    /// Ignored: the authenticated actor is always recorded.
    pub created_by: Option<String>,

    pub service_date: Option<DateTime<Utc>>,
}

impl From<CreateTransactionRequest> for NewTransaction {
    fn from(req: CreateTransactionRequest) -> Self {
        Self {
            service_type: req.service_type,
            quoted_price: req.original_price,
            discount_percent: req.discount_percent.unwrap_or_default(),
            discount_amount: req.discount_amount.unwrap_or_default(),
            payment_method: req.payment_method,
            vehicle_details: req.vehicle_details,
            customer_name: req.customer_name,
            customer_id: req.customer,
            service_date: req.service_date,
            notes: req.notes,
            specials: req.specials,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    pub customer: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl From<TransactionListParams> for TransactionFilter {
    fn from(params: TransactionListParams) -> Self {
        Self {
            customer_id: params.customer.filter(|id| !id.trim().is_empty()),
            payment_method: params.payment_method,
            from: params.from,
            to: params.to,
        }
    }
}

/// Stored fields shared by every transaction response.
///
/// `originalPrice` carries the post-discount price, as stored records always
/// have; `quotedPrice` is the amount entered before discounts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_type: String,
    pub original_price: f64,
    pub quoted_price: f64,
    pub final_price: f64,
    pub discount_amount: f64,
    pub discount_percent: f64,
    pub total_discount: f64,
    pub discount_label: String,
    pub service_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub vehicle_details: String,
    pub customer_name: String,
    pub notes: Option<String>,
    pub specials: Option<String>,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionFields {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            service_type: t.service_type,
            original_price: t.final_price,
            quoted_price: t.quoted_price,
            final_price: t.final_price,
            discount_amount: t.discount_amount,
            discount_percent: t.discount_percent,
            total_discount: t.total_discount,
            discount_label: t.discount_label,
            service_date: t.service_date,
            payment_method: t.payment_method,
            vehicle_details: t.vehicle_details,
            customer_name: t.customer_name,
            notes: t.notes,
            specials: t.specials,
            customer_id: t.customer_id,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorRefResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActorKind,
}

/// Response to a create: references are plain ids.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[serde(flatten)]
    pub fields: TransactionFields,
    pub customer: String,
    pub created_by: ActorRefResponse,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        let customer = t.customer_id.clone();
        let created_by = ActorRefResponse {
            id: t.created_by.id.clone(),
            kind: t.created_by.kind,
        };
        Self {
            fields: t.into(),
            customer,
            created_by,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatorResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<CreatorSummary> for CreatorResponse {
    fn from(creator: CreatorSummary) -> Self {
        Self {
            id: creator.id,
            name: creator.name,
            email: creator.email,
        }
    }
}

/// Read response: references resolved to display objects, `null` when the
/// referenced record is gone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransactionResponse {
    #[serde(flatten)]
    pub fields: TransactionFields,
    pub customer: Option<CustomerResponse>,
    pub created_by: Option<CreatorResponse>,
}

impl From<EnrichedTransaction> for EnrichedTransactionResponse {
    fn from(enriched: EnrichedTransaction) -> Self {
        Self {
            fields: enriched.transaction.into(),
            customer: enriched.customer.map(Into::into),
            created_by: enriched.created_by.map(Into::into),
        }
    }
}
