pub mod actors;
pub mod auth;
pub mod catalog;
pub mod customers;
pub mod database;
pub mod error;
pub mod jwt;
pub mod metrics;
pub mod pricing;
pub mod receipt;
pub mod transactions;

pub use actors::{ActorDirectory, CreatorSummary};
pub use auth::{AuthService, LoginResult};
pub use catalog::CatalogStore;
pub use customers::{CustomerRepository, CustomerUpdate, NewCustomer, ResolvedCustomer};
pub use database::CarwashDb;
pub use error::ServiceError;
pub use jwt::JwtService;
pub use pricing::{compute_pricing, PricingInput, PricingQuote};
pub use receipt::{ReceiptInput, ReceiptRenderer, RenderError, RenderedReceipt};
pub use transactions::{EnrichedTransaction, NewTransaction, TransactionFilter, TransactionRepository};
