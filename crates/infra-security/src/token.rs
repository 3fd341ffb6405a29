// HS256 JWT TokenService

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use paps_core::domain::{EntityId, Role};
use paps_core::error::{AppError, Result};
use paps_core::port::{TokenClaims, TokenService};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session lifetime (7 days)
pub const DEFAULT_TTL_SECS: i64 = 7 * 24 * 3600;

/// Wire claims
///
/// Tokens minted elsewhere may carry the identity as `userId` or nested
/// under `data`; all three shapes are accepted.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<EntityId>,
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<NestedIdentity>,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct NestedIdentity {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default)]
    email: Option<String>,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, DEFAULT_TTL_SECS)
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &TokenClaims) -> Result<String> {
        let now = Utc::now().timestamp();
        let wire = JwtClaims {
            id: claims.id.clone(),
            user_id: None,
            email: claims.email.clone(),
            role: claims.role,
            data: None,
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<JwtClaims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "JWT verification failed");
            AppError::Unauthorized(format!("Invalid token: {}", e))
        })?;

        let claims = data.claims;
        let (nested_id, nested_email) = match claims.data {
            Some(nested) => (nested.id, nested.email),
            None => (None, None),
        };
        Ok(TokenClaims {
            id: nested_id.or(claims.id).or(claims.user_id),
            email: nested_email.or(claims.email),
            role: claims.role,
        })
    }
}
