use std::collections::HashMap;

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection,
};

use super::database::{CarwashDb, CUSTOMER_CODE_INDEX};
use super::error::{duplicate_key_index, is_duplicate_key, ServiceError};
use super::metrics;
use crate::models::Customer;

/// Upper bound on autocomplete suggestions.
pub const SEARCH_LIMIT: i64 = 6;

const DUPLICATE_CUSTOMER: &str = "Customer with this name and vehicle already exists";
const DUPLICATE_CUSTOMER_CODE: &str = "Customer code already in use, please retry";

#[derive(Debug, Clone)]
pub struct ResolvedCustomer {
    pub customer: Customer,
    pub created: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub vehicle_details: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub discount: Option<f64>,
    pub specials: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub vehicle_details: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub discount: Option<f64>,
    pub specials: Option<String>,
}

#[derive(Clone)]
pub struct CustomerRepository {
    customers: Collection<Customer>,
}

impl CustomerRepository {
    pub fn new(db: &CarwashDb) -> Self {
        Self {
            customers: db.customers(),
        }
    }

    /// Find the customer with exactly this (name, vehicle) pair, creating it if
    /// there is none. The unique index decides concurrent creates; the loser
    /// gets a `Conflict` and should resolve again.
    pub async fn resolve(
        &self,
        name: &str,
        vehicle_details: &str,
    ) -> Result<ResolvedCustomer, ServiceError> {
        let name = required(name, "Customer name")?;
        let vehicle_details = required(vehicle_details, "Vehicle details")?;

        if let Some(customer) = self.find_by_name_and_vehicle(&name, &vehicle_details).await? {
            return Ok(ResolvedCustomer {
                customer,
                created: false,
            });
        }

        let customer = Customer::new(&name, &vehicle_details);
        self.insert(&customer).await?;
        tracing::info!(customer_id = %customer.id, customer_code = %customer.customer_code, "Customer created by resolver");

        Ok(ResolvedCustomer {
            customer,
            created: true,
        })
    }

    /// Direct create; an existing (name, vehicle) pair is a conflict.
    pub async fn create(&self, input: NewCustomer) -> Result<Customer, ServiceError> {
        let name = required(&input.name, "Customer name")?;
        let vehicle_details = required(&input.vehicle_details, "Vehicle details")?;

        let mut customer = Customer::new(&name, &vehicle_details);
        customer.phone = optional(input.phone);
        customer.email = optional(input.email);
        customer.specials = optional(input.specials);
        customer.discount = input.discount.unwrap_or_default();

        self.insert(&customer).await?;
        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn find_by_name_and_vehicle(
        &self,
        name: &str,
        vehicle_details: &str,
    ) -> Result<Option<Customer>, ServiceError> {
        let filter = doc! { "name": name, "vehicle_details": vehicle_details };
        Ok(self.customers.find_one(filter, None).await?)
    }

    /// Case-insensitive partial match on name, at most [`SEARCH_LIMIT`] hits.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Customer>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation("Missing name"));
        }

        let filter = doc! {
            "name": { "$regex": regex::escape(query), "$options": "i" }
        };
        let options = FindOptions::builder().limit(SEARCH_LIMIT).build();
        let cursor = self.customers.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.customers.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Customer>, ServiceError> {
        Ok(self.customers.find_one(doc! { "_id": id }, None).await?)
    }

    /// Fetch several customers at once, keyed by id.
    pub async fn get_many(&self, ids: &[String]) -> Result<HashMap<String, Customer>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cursor = self.customers.find(doc! { "_id": { "$in": ids.to_vec() } }, None).await?;
        let customers: Vec<Customer> = cursor.try_collect().await?;
        Ok(customers.into_iter().map(|c| (c.id.clone(), c)).collect())
    }

    pub async fn update(&self, id: &str, update: CustomerUpdate) -> Result<Customer, ServiceError> {
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", required(&name, "Customer name")?);
        }
        if let Some(vehicle_details) = update.vehicle_details {
            set.insert("vehicle_details", required(&vehicle_details, "Vehicle details")?);
        }
        if let Some(phone) = update.phone {
            set.insert("phone", optional_bson(phone));
        }
        if let Some(email) = update.email {
            set.insert("email", optional_bson(email));
        }
        if let Some(specials) = update.specials {
            set.insert("specials", optional_bson(specials));
        }
        if let Some(discount) = update.discount {
            set.insert("discount", discount);
        }
        set.insert("updated_at", mongodb::bson::DateTime::from_chrono(Utc::now()));

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .customers
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await
            .map_err(customer_write_error)?;

        match updated {
            Some(customer) => {
                tracing::info!(customer_id = %customer.id, "Customer updated");
                Ok(customer)
            }
            None => Err(ServiceError::not_found("Customer not found")),
        }
    }

    async fn insert(&self, customer: &Customer) -> Result<(), ServiceError> {
        self.customers
            .insert_one(customer, None)
            .await
            .map_err(customer_write_error)?;
        metrics::record_customer_created();
        Ok(())
    }
}

/// Duplicate keys become conflicts worded for the index that rejected the write.
fn customer_write_error(err: mongodb::error::Error) -> ServiceError {
    if !is_duplicate_key(&err) {
        return ServiceError::Storage(err);
    }
    ServiceError::Conflict(duplicate_message(duplicate_key_index(&err).as_deref()).to_string())
}

fn duplicate_message(index: Option<&str>) -> &'static str {
    match index {
        Some(CUSTOMER_CODE_INDEX) => DUPLICATE_CUSTOMER_CODE,
        _ => DUPLICATE_CUSTOMER,
    }
}

pub(crate) fn required(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_bson(value: String) -> Bson {
    match optional(Some(value)) {
        Some(v) => Bson::String(v),
        None => Bson::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("  Jane  ", "Customer name").unwrap(), "Jane");
        assert!(matches!(
            required("   ", "Customer name"),
            Err(ServiceError::Validation(msg)) if msg == "Customer name is required"
        ));
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" 555-0100 ".into())), Some("555-0100".to_string()));
        assert_eq!(optional_bson(String::new()), Bson::Null);
    }

    #[test]
    fn duplicate_message_names_the_colliding_key() {
        assert_eq!(duplicate_message(Some(CUSTOMER_CODE_INDEX)), DUPLICATE_CUSTOMER_CODE);
        assert_eq!(
            duplicate_message(Some(crate::services::database::CUSTOMER_IDENTITY_INDEX)),
            DUPLICATE_CUSTOMER
        );
        assert_eq!(duplicate_message(None), DUPLICATE_CUSTOMER);
    }
}
