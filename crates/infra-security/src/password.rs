// bcrypt PasswordHasher
// reason: hashing is CPU-bound, run it off the async executor

use async_trait::async_trait;
use paps_core::error::{AppError, Result};
use paps_core::port::PasswordHasher;

/// Work factor compatible with hashes created by the Node backend
pub const DEFAULT_COST: u32 = 10;

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Hash task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Verify task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Malformed password hash: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        // Minimum cost keeps the test fast
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("thieboudienne").await.unwrap();

        assert!(hash.starts_with("$2b$04$"));
        assert!(hasher.verify("thieboudienne", &hash).await.unwrap());
        assert!(!hasher.verify("yassa", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_malformed_hash_errors() {
        let hasher = BcryptHasher::new(4);
        assert!(hasher.verify("pw", "not-a-hash").await.is_err());
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptHasher::default().cost, 10);
    }
}
