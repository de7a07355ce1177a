use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer is identified by the (name, vehicle_details) pair; the store
/// holds a unique index over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_code: String,
    pub name: String,
    pub vehicle_details: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub discount: f64,
    pub specials: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: &str, vehicle_details: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_code: generate_customer_code(now),
            name: name.trim().to_string(),
            vehicle_details: vehicle_details.trim().to_string(),
            phone: None,
            email: None,
            discount: 0.0,
            specials: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `CUST-<unix millis>-<6 hex>`; the random suffix keeps codes unique when two
/// customers are created in the same millisecond.
pub fn generate_customer_code(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("CUST-{}-{}", now.timestamp_millis(), suffix)
}
