use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Customer;
use crate::services::{CustomerUpdate, NewCustomer, ResolvedCustomer};
use crate::utils::not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(custom(function = "not_blank", message = "Customer name is required"))]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "Vehicle details are required"))]
    pub vehicle_details: String,

    pub phone: Option<String>,

    pub email: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount: Option<f64>,

    pub specials: Option<String>,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(req: CreateCustomerRequest) -> Self {
        Self {
            name: req.name,
            vehicle_details: req.vehicle_details,
            phone: req.phone,
            email: req.email,
            discount: req.discount,
            specials: req.specials,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(custom(function = "not_blank", message = "Customer name must not be blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "not_blank", message = "Vehicle details must not be blank"))]
    pub vehicle_details: Option<String>,

    pub phone: Option<String>,

    pub email: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount: Option<f64>,

    pub specials: Option<String>,
}

impl From<UpdateCustomerRequest> for CustomerUpdate {
    fn from(req: UpdateCustomerRequest) -> Self {
        Self {
            name: req.name,
            vehicle_details: req.vehicle_details,
            phone: req.phone,
            email: req.email,
            discount: req.discount,
            specials: req.specials,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveCustomerRequest {
    #[validate(custom(function = "not_blank", message = "Customer name is required"))]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "Vehicle details are required"))]
    pub vehicle_details: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveCustomerResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_code: String,
    pub created: bool,
}

impl From<ResolvedCustomer> for ResolveCustomerResponse {
    fn from(resolved: ResolvedCustomer) -> Self {
        Self {
            id: resolved.customer.id,
            customer_code: resolved.customer.customer_code,
            created: resolved.created,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_code: String,
    pub name: String,
    pub vehicle_details: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub discount: f64,
    pub specials: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            customer_code: customer.customer_code,
            name: customer.name,
            vehicle_details: customer.vehicle_details,
            phone: customer.phone,
            email: customer.email,
            discount: customer.discount,
            specials: customer.specials,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}
