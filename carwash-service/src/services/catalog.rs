use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection,
};
use uuid::Uuid;

use super::database::CarwashDb;
use super::error::ServiceError;
use crate::models::{CatalogService, ServicePrice, Special};

/// Services and specials offered by the shop. Pricing only reads these.
#[derive(Clone)]
pub struct CatalogStore {
    services: Collection<CatalogService>,
    specials: Collection<Special>,
}

impl CatalogStore {
    pub fn new(db: &CarwashDb) -> Self {
        Self {
            services: db.services(),
            specials: db.specials(),
        }
    }

    pub async fn list_services(&self) -> Result<Vec<CatalogService>, ServiceError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.services.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn create_service(
        &self,
        name: &str,
        price: ServicePrice,
    ) -> Result<CatalogService, ServiceError> {
        let service = CatalogService {
            id: Uuid::new_v4().to_string(),
            name: catalog_name(name)?,
            price: checked_price(price)?,
        };
        self.services.insert_one(&service, None).await?;
        tracing::info!(service_id = %service.id, name = %service.name, "Catalog service created");
        Ok(service)
    }

    pub async fn update_service(
        &self,
        id: &str,
        name: Option<&str>,
        price: Option<ServicePrice>,
    ) -> Result<CatalogService, ServiceError> {
        let mut set = Document::new();
        if let Some(name) = name {
            set.insert("name", catalog_name(name)?);
        }
        if let Some(price) = price {
            set.insert("price", mongodb::bson::to_bson(&checked_price(price)?)?);
        }

        let updated = if set.is_empty() {
            self.services.find_one(doc! { "_id": id }, None).await?
        } else {
            self.services
                .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, return_after())
                .await?
        };
        updated.ok_or_else(|| ServiceError::not_found("Service not found"))
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), ServiceError> {
        let result = self.services.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(ServiceError::not_found("Service not found"));
        }
        tracing::info!(service_id = %id, "Catalog service deleted");
        Ok(())
    }

    pub async fn list_specials(&self) -> Result<Vec<Special>, ServiceError> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.specials.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn create_special(
        &self,
        name: &str,
        discount_percent: f64,
    ) -> Result<Special, ServiceError> {
        let special = Special {
            id: Uuid::new_v4().to_string(),
            name: catalog_name(name)?,
            discount_percent: checked_percent(discount_percent)?,
        };
        self.specials.insert_one(&special, None).await?;
        tracing::info!(special_id = %special.id, name = %special.name, "Special created");
        Ok(special)
    }

    pub async fn update_special(
        &self,
        id: &str,
        name: Option<&str>,
        discount_percent: Option<f64>,
    ) -> Result<Special, ServiceError> {
        let mut set = Document::new();
        if let Some(name) = name {
            set.insert("name", catalog_name(name)?);
        }
        if let Some(percent) = discount_percent {
            set.insert("discount_percent", checked_percent(percent)?);
        }

        let updated = if set.is_empty() {
            self.specials.find_one(doc! { "_id": id }, None).await?
        } else {
            self.specials
                .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, return_after())
                .await?
        };
        updated.ok_or_else(|| ServiceError::not_found("Special not found"))
    }

    pub async fn delete_special(&self, id: &str) -> Result<(), ServiceError> {
        let result = self.specials.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(ServiceError::not_found("Special not found"));
        }
        tracing::info!(special_id = %id, "Special deleted");
        Ok(())
    }
}

fn return_after() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

fn catalog_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("Name is required"));
    }
    Ok(name.to_string())
}

fn checked_price(price: ServicePrice) -> Result<ServicePrice, ServiceError> {
    if !price.is_valid() {
        return Err(ServiceError::validation(
            "Price must be a non-negative number or a range with min <= max",
        ));
    }
    Ok(price)
}

fn checked_percent(percent: f64) -> Result<f64, ServiceError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(ServiceError::validation("discountPercent must be between 0 and 100"));
    }
    Ok(percent)
}
