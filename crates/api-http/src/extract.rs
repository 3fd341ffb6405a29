//! Request extractors: JSON bodies and the signed-in merchant

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use paps_core::application::MerchantContext;

use crate::error::ApiError;
use crate::state::AppState;

/// `Json` whose rejection uses the API error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Token carried by `Authorization: Bearer <token>`
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    Some(token.trim())
}

/// A signed-in merchant with its shop id
pub struct MerchantUser(pub MerchantContext);

#[async_trait]
impl FromRequestParts<AppState> for MerchantUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = state.auth.authenticate_merchant(bearer_token(parts)).await?;
        Ok(MerchantUser(ctx))
    }
}
