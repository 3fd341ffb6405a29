// SQLite SubscriptionRepository Implementation

use crate::error::{from_millis, map_sqlx_error, parse_column};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paps_core::domain::{Subscription, SubscriptionStatus};
use paps_core::error::Result;
use paps_core::port::SubscriptionRepository;
use sqlx::SqlitePool;

pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn insert(&self, subscription: &Subscription) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, merchant_id, start_at, end_at, status, price)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&subscription.id)
        .bind(&subscription.merchant_id)
        .bind(subscription.start.timestamp_millis())
        .bind(subscription.end.timestamp_millis())
        .bind(subscription.status.as_str())
        .bind(subscription.price)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            "SELECT id, merchant_id, start_at, end_at, status, price FROM subscriptions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(SubscriptionRow::into_subscription).transpose()
    }

    async fn list_by_merchant(&self, merchant_id: &str) -> Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, merchant_id, start_at, end_at, status, price FROM subscriptions
            WHERE merchant_id = ?
            ORDER BY start_at DESC
            "#,
        )
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(SubscriptionRow::into_subscription)
            .collect()
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("UPDATE subscriptions SET status = ? WHERE status = ? AND end_at < ?")
            .bind(SubscriptionStatus::Inactive.as_str())
            .bind(SubscriptionStatus::Active.as_str())
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: String,
    merchant_id: String,
    start_at: i64,
    end_at: i64,
    status: String,
    price: f64,
}

impl SubscriptionRow {
    fn into_subscription(self) -> Result<Subscription> {
        Ok(Subscription {
            status: parse_column::<SubscriptionStatus>("status", &self.status)?,
            id: self.id,
            merchant_id: self.merchant_id,
            start: from_millis(self.start_at),
            end: from_millis(self.end_at),
            price: self.price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use chrono::{Duration, TimeZone};

    async fn setup_repo() -> SqliteSubscriptionRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        sqlx::query("INSERT INTO merchants (id, shop_name, created_at) VALUES ('m1', 'Shop', 0)")
            .execute(&pool)
            .await
            .unwrap();
        SqliteSubscriptionRepository::new(pool)
    }

    #[tokio::test]
    async fn test_insert_and_history() {
        let repo = setup_repo().await;
        let jan = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap();
        repo.insert(&Subscription::monthly("s1", "m1", jan, 5000.0))
            .await
            .unwrap();
        repo.insert(&Subscription::monthly("s2", "m1", feb, 5000.0))
            .await
            .unwrap();

        let history = repo.list_by_merchant("m1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "s2");
        assert_eq!(history[1].end, feb);
    }

    #[tokio::test]
    async fn test_expire_ended() {
        let repo = setup_repo().await;
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        repo.insert(&Subscription::monthly("s1", "m1", start, 5000.0))
            .await
            .unwrap();

        assert_eq!(repo.expire_ended(start + Duration::days(20)).await.unwrap(), 0);
        assert_eq!(repo.expire_ended(start + Duration::days(40)).await.unwrap(), 1);
        // Already inactive, not counted again
        assert_eq!(repo.expire_ended(start + Duration::days(41)).await.unwrap(), 0);

        let sub = repo.find_by_id("s1").await.unwrap().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Inactive);
    }
}
