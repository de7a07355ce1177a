use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{CatalogService, ServicePrice, Special};
use crate::utils::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    pub price: ServicePrice,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(custom(function = "not_blank", message = "Name must not be blank"))]
    pub name: Option<String>,

    pub price: Option<ServicePrice>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpecialRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[validate(range(min = 0.0, max = 100.0, message = "discountPercent must be between 0 and 100"))]
    pub discount_percent: f64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpecialRequest {
    #[validate(custom(function = "not_blank", message = "Name must not be blank"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "discountPercent must be between 0 and 100"))]
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: ServicePrice,
}

impl From<CatalogService> for ServiceResponse {
    fn from(service: CatalogService) -> Self {
        Self {
            id: service.id,
            name: service.name,
            price: service.price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub discount_percent: f64,
}

impl From<Special> for SpecialResponse {
    fn from(special: Special) -> Self {
        Self {
            id: special.id,
            name: special.name,
            discount_percent: special.discount_percent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
