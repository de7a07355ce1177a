pub mod auth;
pub mod catalog;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod receipts;
pub mod transactions;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
