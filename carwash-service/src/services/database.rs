use crate::models::{CatalogService, Customer, Employee, Special, Transaction, User};
use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Duration;

pub const CUSTOMER_IDENTITY_INDEX: &str = "customer_identity";
pub const CUSTOMER_CODE_INDEX: &str = "customer_code_unique";

#[derive(Clone)]
pub struct CarwashDb {
    client: MongoClient,
    db: Database,
}

impl CarwashDb {
    /// Build a client for `uri`. The driver connects lazily, so this succeeds
    /// even when the server is down; the first operation surfaces the failure.
    pub async fn connect(
        uri: &str,
        database: &str,
        app_name: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        options.app_name = Some(app_name.to_string());
        options.server_selection_timeout = Some(server_selection_timeout);

        let client = MongoClient::with_options(options)?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for carwash-service");

        let customer_identity = IndexModel::builder()
            .keys(doc! { "name": 1, "vehicle_details": 1 })
            .options(
                IndexOptions::builder()
                    .name(CUSTOMER_IDENTITY_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        let customer_code = IndexModel::builder()
            .keys(doc! { "customer_code": 1 })
            .options(
                IndexOptions::builder()
                    .name(CUSTOMER_CODE_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.customers()
            .create_indexes([customer_identity, customer_code], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on customers collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created indexes on customers.(name, vehicle_details) and customers.customer_code");

        let by_service_date = IndexModel::builder()
            .keys(doc! { "service_date": -1 })
            .options(
                IndexOptions::builder()
                    .name("service_date_desc".to_string())
                    .build(),
            )
            .build();
        let by_customer = IndexModel::builder()
            .keys(doc! { "customer_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("customer_lookup".to_string())
                    .build(),
            )
            .build();
        self.transactions()
            .create_indexes([by_service_date, by_customer], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on transactions collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created indexes on transactions.service_date and transactions.customer_id");

        let user_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.users()
            .create_index(user_email, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create email index on users collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on users.email");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn customers(&self) -> Collection<Customer> {
        self.db.collection("customers")
    }

    pub fn transactions(&self) -> Collection<Transaction> {
        self.db.collection("transactions")
    }

    pub fn services(&self) -> Collection<CatalogService> {
        self.db.collection("services")
    }

    pub fn specials(&self) -> Collection<Special> {
        self.db.collection("specials")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn employees(&self) -> Collection<Employee> {
        self.db.collection("employees")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
