// Subscription Repository Port (Interface)

use crate::domain::Subscription;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a new subscription
    async fn insert(&self, subscription: &Subscription) -> Result<()>;

    /// Find subscription by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>>;

    /// Subscriptions of a merchant, newest first
    async fn list_by_merchant(&self, merchant_id: &str) -> Result<Vec<Subscription>>;

    /// Mark active subscriptions whose end is before `now` as inactive
    ///
    /// Returns the number of subscriptions expired.
    async fn expire_ended(&self, now: DateTime<Utc>) -> Result<u64>;
}
