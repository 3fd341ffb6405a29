// Key-Value Store Port (Interface)

use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Flat JSON document store addressed by string keys
///
/// Keys follow `{collection}:{owner}:{id}` so that `get_by_prefix`
/// can list one owner's documents.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or replace
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Returns false when the key did not exist
    async fn del(&self, key: &str) -> Result<bool>;

    /// All values whose key starts with `prefix`, in key order
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>>;
}

impl dyn KvStore {
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        self.set(key, serde_json::to_value(value)?).await
    }

    /// Typed prefix scan; documents that fail to decode are skipped with a warning
    pub async fn list_json<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let values = self.get_by_prefix(prefix).await?;
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value(value) {
                Ok(doc) => out.push(doc),
                Err(e) => tracing::warn!(prefix, error = %e, "Skipping malformed document"),
            }
        }
        Ok(out)
    }
}
