//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler,
//! plus the domain counters recorded by the repositories.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use crate::models::PaymentMethod;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
/// Panics if called more than once.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_customer_created() {
    metrics::counter!("carwash_customers_created_total").increment(1);
}

pub fn record_transaction_created(payment_method: PaymentMethod) {
    metrics::counter!(
        "carwash_transactions_created_total",
        "payment_method" => payment_method.as_str()
    )
    .increment(1);
}

pub fn record_receipt_rendered(logo_included: bool) {
    let logo = if logo_included { "true" } else { "false" };
    metrics::counter!("carwash_receipts_rendered_total", "logo" => logo).increment(1);
}
