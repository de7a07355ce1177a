use serde::{Deserialize, Serialize};

/// A service offered by the shop, priced either at a fixed amount or a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogService {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: ServicePrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServicePrice {
    Fixed(f64),
    Range { min: f64, max: f64 },
}

impl ServicePrice {
    pub fn is_valid(&self) -> bool {
        match *self {
            ServicePrice::Fixed(price) => price.is_finite() && price >= 0.0,
            ServicePrice::Range { min, max } => {
                min.is_finite() && max.is_finite() && min >= 0.0 && min <= max
            }
        }
    }
}

/// A named promotion applying a percentage discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Special {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub discount_percent: f64,
}
