// Port Layer - Interfaces for external dependencies

pub mod account_repository;
pub mod catalog_repository;
pub mod id_provider; // For deterministic testing
pub mod kv_store;
pub mod security;
pub mod subscription_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use account_repository::AccountRepository;
pub use catalog_repository::CatalogRepository;
pub use id_provider::IdProvider;
pub use kv_store::KvStore;
pub use security::{PasswordHasher, TokenClaims, TokenService};
pub use subscription_repository::SubscriptionRepository;
pub use time_provider::TimeProvider;
pub use transaction::{AccountTransaction, Transaction, TransactionalAccountRepository};
