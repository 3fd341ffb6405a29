// Account Repository Port (Interface)

use crate::domain::{AccountStatus, Courier, EntityId, Merchant, User};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for users, merchants and couriers
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find user by ID
    async fn find_user(&self, id: &str) -> Result<Option<User>>;

    /// Find user by email (exact match)
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find the user account linked to a courier record
    async fn find_user_by_courier(&self, courier_id: &str) -> Result<Option<User>>;

    /// Update mutable user fields (names, phone, merchant link, subscription, status)
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Delete a user; returns false when nothing matched
    async fn delete_user(&self, id: &str) -> Result<bool>;

    /// Users with role `livreur` attached to a merchant
    async fn list_courier_users(&self, merchant_id: &str) -> Result<Vec<User>>;

    /// Find courier record by ID
    async fn find_courier(&self, id: &str) -> Result<Option<Courier>>;

    /// All courier records
    async fn list_couriers(&self) -> Result<Vec<Courier>>;

    /// Move a courier record to another merchant
    async fn set_courier_merchant(&self, courier_id: &str, merchant_id: &str) -> Result<()>;

    /// Find merchant by ID
    async fn find_merchant(&self, id: &str) -> Result<Option<Merchant>>;

    /// All merchants, oldest first
    async fn list_merchants(&self) -> Result<Vec<Merchant>>;

    /// Change a merchant's status
    async fn set_merchant_status(&self, id: &EntityId, status: AccountStatus) -> Result<()>;
}
