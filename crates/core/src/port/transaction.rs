// Transaction port for atomic operations

use crate::domain::{Courier, Merchant, User};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional account operations
#[async_trait]
pub trait TransactionalAccountRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn AccountTransaction>>;
}

/// Account writes within a transaction (sign-up creates two linked records)
#[async_trait]
pub trait AccountTransaction: Transaction {
    /// Check whether an email is already registered (within transaction)
    async fn email_exists(&mut self, email: &str) -> Result<bool>;

    /// Insert merchant (within transaction)
    async fn insert_merchant(&mut self, merchant: &Merchant) -> Result<()>;

    /// Insert courier record (within transaction)
    async fn insert_courier(&mut self, courier: &Courier) -> Result<()>;

    /// Insert user (within transaction)
    async fn insert_user(&mut self, user: &User) -> Result<()>;
}
