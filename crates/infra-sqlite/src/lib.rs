// PAPS Infrastructure - SQLite Adapter
// Implements: AccountRepository (+ transactions), CatalogRepository,
// SubscriptionRepository, KvStore

mod account_repository;
mod catalog_repository;
mod connection;
mod error;
mod kv_store;
mod migration;
mod subscription_repository;
mod transaction;

pub use account_repository::SqliteAccountRepository;
pub use catalog_repository::SqliteCatalogRepository;
pub use connection::{create_pool, database_url};
pub use kv_store::SqliteKvStore;
pub use migration::run_migrations;
pub use subscription_repository::SqliteSubscriptionRepository;
pub use transaction::SqliteAccountTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
