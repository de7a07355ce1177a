//! Receipt documents.
//!
//! A receipt is rendered from the numbers the user entered (pre-discount
//! price, discount inputs, final price), not from a stored transaction's
//! fields, so "Original Price" on the receipt is always the quoted amount.

use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;

use super::metrics;
use super::pricing::round_money;
use crate::config::ReceiptConfig;
use crate::models::{PaymentMethod, Transaction};

pub const RECEIPT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Receipt logo unavailable at {path}: {source}")]
    LogoUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render receipt template: {0}")]
    Template(#[from] askama::Error),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Clone)]
pub struct ReceiptInput {
    pub customer_name: String,
    pub vehicle_details: String,
    pub email: Option<String>,
    /// Falls back to the configured label when absent.
    pub employee_label: Option<String>,
    pub service_type: String,
    pub specials_label: Option<String>,
    pub payment_method: PaymentMethod,
    pub original_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub notes: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl ReceiptInput {
    /// Receipt for a stored transaction, using its pre-discount price and the
    /// total discount actually deducted.
    pub fn from_transaction(
        transaction: &Transaction,
        email: Option<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_name: transaction.customer_name.clone(),
            vehicle_details: transaction.vehicle_details.clone(),
            email,
            employee_label: None,
            service_type: transaction.service_type.clone(),
            specials_label: transaction.specials.clone(),
            payment_method: transaction.payment_method,
            original_price: decimal(transaction.quoted_price),
            discount_percent: decimal(transaction.discount_percent),
            discount_amount: decimal(transaction.total_discount),
            final_price: decimal(transaction.final_price),
            notes: transaction.notes.clone(),
            issued_at,
        }
    }
}

fn decimal(value: f64) -> Decimal {
    super::pricing::money_from_f64(value, "amount").unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct RenderedReceipt {
    pub html: String,
    pub filename: String,
    pub logo_included: bool,
}

#[derive(Template)]
#[template(path = "receipt.html")]
struct ReceiptTemplate<'a> {
    business_name: &'a str,
    tagline: &'a str,
    logo_base64: String,
    date: String,
    customer_name: &'a str,
    vehicle_details: &'a str,
    email: &'a str,
    service_type: &'a str,
    employee: &'a str,
    payment_method: &'a str,
    special: &'a str,
    original_price: String,
    discount_percent: String,
    discount_amount: String,
    total: String,
    notes: &'a str,
}

#[derive(Clone)]
pub struct ReceiptRenderer {
    config: ReceiptConfig,
}

impl ReceiptRenderer {
    pub fn new(config: ReceiptConfig) -> Self {
        Self { config }
    }

    /// Render a receipt. A logo that cannot be read is logged and left out;
    /// only a template failure is returned as an error.
    pub async fn render(&self, input: &ReceiptInput) -> Result<RenderedReceipt, RenderError> {
        let logo_base64 = match self.load_logo().await {
            Ok(logo) => logo.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Rendering receipt without logo");
                String::new()
            }
        };
        let logo_included = !logo_base64.is_empty();

        let template = ReceiptTemplate {
            business_name: &self.config.business_name,
            tagline: &self.config.tagline,
            logo_base64,
            date: input.issued_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            customer_name: &input.customer_name,
            vehicle_details: &input.vehicle_details,
            email: input.email.as_deref().unwrap_or_default(),
            service_type: &input.service_type,
            employee: input
                .employee_label
                .as_deref()
                .filter(|label| !label.trim().is_empty())
                .unwrap_or(&self.config.employee_label),
            payment_method: input.payment_method.as_str(),
            special: input.specials_label.as_deref().unwrap_or_default(),
            original_price: format_money(input.original_price),
            discount_percent: input.discount_percent.normalize().to_string(),
            discount_amount: format_money(input.discount_amount),
            total: format_money(input.final_price),
            notes: input
                .notes
                .as_deref()
                .filter(|notes| !notes.trim().is_empty())
                .unwrap_or("\u{2014}"),
        };

        let html = template.render()?;
        metrics::record_receipt_rendered(logo_included);

        Ok(RenderedReceipt {
            html,
            filename: format!("receipt-{}.html", input.issued_at.timestamp_millis()),
            logo_included,
        })
    }

    async fn load_logo(&self) -> Result<Option<String>, RenderError> {
        let Some(path) = &self.config.logo_path else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RenderError::LogoUnavailable {
                path: path.clone(),
                source,
            })?;
        Ok(Some(STANDARD.encode(bytes)))
    }
}

/// `$` followed by the amount rounded to cents.
pub fn format_money(value: Decimal) -> String {
    format!("${:.2}", round_money(value))
}
