// SQLite-backed KvStore (marketplace documents)

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use paps_core::error::{AppError, Result};
use paps_core::port::KvStore;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so a prefix matches literally
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(|e| {
                AppError::Database(format!("Corrupt value at {}: {}", key, e))
            })?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM kv_store WHERE key LIKE ? ESCAPE '\\' ORDER BY key",
        )
        .bind(like_prefix(prefix))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut values = Vec::with_capacity(rows.len());
        for (key, raw) in rows {
            // LIKE is case-insensitive for ASCII; keep exact matches only
            if !key.starts_with(prefix) {
                continue;
            }
            match serde_json::from_str(&raw) {
                Ok(value) => values.push(value),
                Err(e) => warn!(key = %key, error = %e, "Skipping corrupt kv value"),
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use serde_json::json;

    async fn setup_store() -> SqliteKvStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteKvStore::new(pool)
    }

    #[tokio::test]
    async fn test_set_get_del() {
        let kv = setup_store().await;
        kv.set("merchants:m1", json!({"name": "Chez Fatou"}))
            .await
            .unwrap();
        kv.set("merchants:m1", json!({"name": "Chez Awa"}))
            .await
            .unwrap();

        let value = kv.get("merchants:m1").await.unwrap().unwrap();
        assert_eq!(value["name"], "Chez Awa");

        assert!(kv.del("merchants:m1").await.unwrap());
        assert!(!kv.del("merchants:m1").await.unwrap());
        assert!(kv.get("merchants:m1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prefix_scan_is_literal() {
        let kv = setup_store().await;
        kv.set("products:m1:a", json!(1)).await.unwrap();
        kv.set("products:m1:b", json!(2)).await.unwrap();
        kv.set("products:m10:c", json!(3)).await.unwrap();
        kv.set("products:M1:d", json!(4)).await.unwrap();
        kv.set("products:m_:e", json!(5)).await.unwrap();

        let values = kv.get_by_prefix("products:m1:").await.unwrap();
        assert_eq!(values, vec![json!(1), json!(2)]);

        // '_' is not a wildcard
        let values = kv.get_by_prefix("products:m_:").await.unwrap();
        assert_eq!(values, vec![json!(5)]);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let kv: std::sync::Arc<dyn KvStore> = std::sync::Arc::new(setup_store().await);
        kv.set_json("k:1", &vec!["a", "b"]).await.unwrap();
        let back: Vec<String> = kv.get_json("k:1").await.unwrap().unwrap();
        assert_eq!(back, vec!["a", "b"]);
    }
}
