// SQLite AccountRepository Implementation

use crate::error::{from_millis, map_sqlx_error, parse_column};
use crate::SqliteAccountTransaction;
use async_trait::async_trait;
use paps_core::domain::{AccountStatus, Courier, EntityId, Merchant, Role, User};
use paps_core::error::{AppError, Result};
use paps_core::port::{AccountRepository, AccountTransaction, TransactionalAccountRepository};
use sqlx::SqlitePool;

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, first_name, last_name, role, phone, email, password_hash, \
     merchant_id, courier_id, client_id, subscription_id, status, created_at";

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_courier(&self, courier_id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE courier_id = ? LIMIT 1"
        ))
        .bind(courier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, phone = ?, merchant_id = ?,
                subscription_id = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.merchant_id)
        .bind(&user.subscription_id)
        .bind(user.status.as_str())
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user.id)));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_courier_users(&self, merchant_id: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE merchant_id = ? AND role = ? ORDER BY created_at"
        ))
        .bind(merchant_id)
        .bind(Role::Livreur.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn find_courier(&self, id: &str) -> Result<Option<Courier>> {
        let row = sqlx::query_as::<_, CourierRow>(
            "SELECT id, merchant_id, created_at FROM couriers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CourierRow::into_courier))
    }

    async fn list_couriers(&self) -> Result<Vec<Courier>> {
        let rows = sqlx::query_as::<_, CourierRow>(
            "SELECT id, merchant_id, created_at FROM couriers ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CourierRow::into_courier).collect())
    }

    async fn set_courier_merchant(&self, courier_id: &str, merchant_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE couriers SET merchant_id = ? WHERE id = ?")
            .bind(merchant_id)
            .bind(courier_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Courier {} not found", courier_id)));
        }
        Ok(())
    }

    async fn find_merchant(&self, id: &str) -> Result<Option<Merchant>> {
        let row = sqlx::query_as::<_, MerchantRow>(
            "SELECT id, shop_name, address, status, created_at FROM merchants WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(MerchantRow::into_merchant).transpose()
    }

    async fn list_merchants(&self) -> Result<Vec<Merchant>> {
        let rows = sqlx::query_as::<_, MerchantRow>(
            "SELECT id, shop_name, address, status, created_at FROM merchants ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MerchantRow::into_merchant).collect()
    }

    async fn set_merchant_status(&self, id: &EntityId, status: AccountStatus) -> Result<()> {
        let result = sqlx::query("UPDATE merchants SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Merchant {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionalAccountRepository for SqliteAccountRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn AccountTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteAccountTransaction::new(tx)))
    }
}

/// SQLite row representation of a user
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    role: String,
    phone: Option<String>,
    email: String,
    password_hash: String,
    merchant_id: Option<String>,
    courier_id: Option<String>,
    client_id: Option<String>,
    subscription_id: Option<String>,
    status: String,
    created_at: i64,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        Ok(User {
            role: parse_column::<Role>("role", &self.role)?,
            status: parse_column::<AccountStatus>("status", &self.status)?,
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            password_hash: self.password_hash,
            merchant_id: self.merchant_id,
            courier_id: self.courier_id,
            client_id: self.client_id,
            subscription_id: self.subscription_id,
            created_at: from_millis(self.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MerchantRow {
    id: String,
    shop_name: String,
    address: String,
    status: String,
    created_at: i64,
}

impl MerchantRow {
    fn into_merchant(self) -> Result<Merchant> {
        Ok(Merchant {
            status: parse_column::<AccountStatus>("status", &self.status)?,
            id: self.id,
            shop_name: self.shop_name,
            address: self.address,
            created_at: from_millis(self.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourierRow {
    id: String,
    merchant_id: Option<String>,
    created_at: i64,
}

impl CourierRow {
    fn into_courier(self) -> Courier {
        Courier {
            id: self.id,
            merchant_id: self.merchant_id,
            created_at: from_millis(self.created_at),
        }
    }
}
