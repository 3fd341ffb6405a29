// Security Ports (password hashing and tokens)

use crate::domain::{EntityId, Role};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One-way password hashing
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String>;

    /// False on mismatch; errors only on a malformed hash
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Identity carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: Option<EntityId>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

pub trait TokenService: Send + Sync {
    /// Sign a token for these claims
    fn issue(&self, claims: &TokenClaims) -> Result<String>;

    /// Check signature and expiry, returning the claims
    ///
    /// Fails with `AppError::Unauthorized` on any invalid token.
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}
