use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Collection,
};
use uuid::Uuid;

use super::actors::{ActorDirectory, CreatorSummary};
use super::customers::{optional, required, CustomerRepository};
use super::database::CarwashDb;
use super::error::ServiceError;
use super::metrics;
use super::pricing::{money_to_f64, PricingInput};
use crate::models::{AuthenticatedActor, Customer, PaymentMethod, Transaction};

/// A sale as submitted, before customer resolution and pricing.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub service_type: String,
    pub quoted_price: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub payment_method: PaymentMethod,
    pub vehicle_details: String,
    pub customer_name: String,
    /// When absent the customer is resolved from name and vehicle.
    pub customer_id: Option<String>,
    pub service_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub specials: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub customer_id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    fn to_document(&self) -> Result<Document, ServiceError> {
        let mut filter = Document::new();
        if let Some(customer_id) = &self.customer_id {
            filter.insert("customer_id", customer_id.as_str());
        }
        if let Some(method) = self.payment_method {
            filter.insert("payment_method", mongodb::bson::to_bson(&method)?);
        }

        let mut range = Document::new();
        if let Some(from) = self.from {
            range.insert("$gte", mongodb::bson::DateTime::from_chrono(from));
        }
        if let Some(to) = self.to {
            range.insert("$lte", mongodb::bson::DateTime::from_chrono(to));
        }
        if !range.is_empty() {
            filter.insert("service_date", range);
        }
        Ok(filter)
    }
}

/// A stored transaction joined with its customer and creator at read time.
/// Either side is `None` when the referenced record no longer exists.
#[derive(Debug, Clone)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub customer: Option<Customer>,
    pub created_by: Option<CreatorSummary>,
}

#[derive(Clone)]
pub struct TransactionRepository {
    transactions: Collection<Transaction>,
    customers: CustomerRepository,
    actors: ActorDirectory,
}

impl TransactionRepository {
    pub fn new(db: &CarwashDb, customers: CustomerRepository, actors: ActorDirectory) -> Self {
        Self {
            transactions: db.transactions(),
            customers,
            actors,
        }
    }

    /// Resolve the customer, price the sale and store it as one document.
    ///
    /// Input and the acting user are checked before the resolver runs, so a
    /// rejected draft never creates a customer.
    pub async fn create(
        &self,
        draft: NewTransaction,
        actor: &AuthenticatedActor,
    ) -> Result<Transaction, ServiceError> {
        let service_type = required(&draft.service_type, "serviceType")?;
        let vehicle_details = required(&draft.vehicle_details, "vehicleDetails")?;
        let customer_name = required(&draft.customer_name, "customerName")?;
        let pricing = PricingInput::from_wire(
            draft.quoted_price,
            draft.discount_percent,
            draft.discount_amount,
        )?;

        let created_by = actor.actor_ref();
        if !self.actors.exists(&created_by).await? {
            return Err(ServiceError::Reference(format!(
                "{} {} not found",
                created_by.kind, created_by.id
            )));
        }

        let customer_id = match draft.customer_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                self.customers
                    .get(id)
                    .await?
                    .ok_or_else(|| ServiceError::Reference(format!("Customer {id} not found")))?
                    .id
            }
            _ => {
                self.customers
                    .resolve(&customer_name, &vehicle_details)
                    .await?
                    .customer
                    .id
            }
        };

        let quote = pricing.quote();
        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            service_type,
            quoted_price: money_to_f64(pricing.quoted_price),
            final_price: money_to_f64(quote.final_price),
            discount_percent: money_to_f64(pricing.discount_percent),
            discount_amount: money_to_f64(pricing.discount_amount),
            total_discount: money_to_f64(quote.discount_amount),
            discount_label: quote.discount_label,
            service_date: draft.service_date.unwrap_or(now),
            payment_method: draft.payment_method,
            vehicle_details,
            customer_name,
            notes: optional(draft.notes),
            specials: optional(draft.specials),
            customer_id,
            created_by,
            created_at: now,
            updated_at: now,
        };

        self.transactions.insert_one(&transaction, None).await?;
        metrics::record_transaction_created(transaction.payment_method);
        tracing::info!(
            transaction_id = %transaction.id,
            customer_id = %transaction.customer_id,
            final_price = transaction.final_price,
            "Transaction created"
        );

        Ok(transaction)
    }

    /// Matching transactions, newest service date first.
    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, ServiceError> {
        let options = FindOptions::builder()
            .sort(doc! { "service_date": -1, "created_at": -1 })
            .build();
        let cursor = self.transactions.find(filter.to_document()?, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_enriched(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<EnrichedTransaction>, ServiceError> {
        let transactions = self.list(filter).await?;
        self.enrich(transactions).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Transaction>, ServiceError> {
        Ok(self.transactions.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn get_enriched(&self, id: &str) -> Result<EnrichedTransaction, ServiceError> {
        let transaction = self
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Transaction not found"))?;
        let mut enriched = self.enrich(vec![transaction]).await?;
        enriched
            .pop()
            .ok_or_else(|| ServiceError::not_found("Transaction not found"))
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let result = self.transactions.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(ServiceError::not_found("Transaction not found"));
        }
        tracing::info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }

    async fn enrich(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<EnrichedTransaction>, ServiceError> {
        let mut customer_ids: Vec<String> =
            transactions.iter().map(|t| t.customer_id.clone()).collect();
        customer_ids.sort();
        customer_ids.dedup();

        let mut creator_ids: Vec<String> =
            transactions.iter().map(|t| t.created_by.id.clone()).collect();
        creator_ids.sort();
        creator_ids.dedup();

        let customers = self.customers.get_many(&customer_ids).await?;
        let creators = self.actors.creators(&creator_ids).await?;

        Ok(transactions
            .into_iter()
            .map(|transaction| EnrichedTransaction {
                customer: customers.get(&transaction.customer_id).cloned(),
                created_by: creators.get(&transaction.created_by.id).cloned(),
                transaction,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TransactionFilter::default().to_document().unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn filter_builds_inclusive_date_range() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let filter = TransactionFilter {
            customer_id: Some("c-1".into()),
            payment_method: Some(PaymentMethod::MobilePayment),
            from: Some(from),
            to: Some(to),
        }
        .to_document()
        .unwrap();

        assert_eq!(filter.get_str("customer_id").unwrap(), "c-1");
        assert_eq!(filter.get_str("payment_method").unwrap(), "Mobile Payment");
        let range = filter.get_document("service_date").unwrap();
        assert!(range.contains_key("$gte"));
        assert!(range.contains_key("$lte"));
    }
}
