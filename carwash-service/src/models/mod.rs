pub mod actor;
pub mod catalog;
pub mod customer;
pub mod transaction;

pub use actor::{ActorKind, ActorRef, AuthenticatedActor, Employee, Role, User};
pub use catalog::{CatalogService, ServicePrice, Special};
pub use customer::Customer;
pub use transaction::{PaymentMethod, Transaction};
