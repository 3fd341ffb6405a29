// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use paps_core::domain::{Courier, Merchant, User};
use paps_core::error::Result;
use paps_core::port::{AccountTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

pub struct SqliteAccountTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteAccountTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteAccountTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl AccountTransaction for SqliteAccountTransaction<'_> {
    async fn email_exists(&mut self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count > 0)
    }

    async fn insert_merchant(&mut self, merchant: &Merchant) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO merchants (id, shop_name, address, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&merchant.id)
        .bind(&merchant.shop_name)
        .bind(&merchant.address)
        .bind(merchant.status.as_str())
        .bind(merchant.created_at.timestamp_millis())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_courier(&mut self, courier: &Courier) -> Result<()> {
        sqlx::query("INSERT INTO couriers (id, merchant_id, created_at) VALUES (?, ?, ?)")
            .bind(&courier.id)
            .bind(&courier.merchant_id)
            .bind(courier.created_at.timestamp_millis())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_user(&mut self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, role, phone, email, password_hash,
                merchant_id, courier_id, client_id, subscription_id, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.merchant_id)
        .bind(&user.courier_id)
        .bind(&user.client_id)
        .bind(&user.subscription_id)
        .bind(user.status.as_str())
        .bind(user.created_at.timestamp_millis())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
