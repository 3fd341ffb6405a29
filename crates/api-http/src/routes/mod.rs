//! Route tables

mod auth;
mod catalog;
mod couriers;
mod marketplace;
mod subscriptions;

use axum::http::Uri;
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// Account, catalog, courier and subscription routes (mounted under `/api`)
pub fn api() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(couriers::routes())
        .merge(catalog::routes())
        .merge(subscriptions::routes())
}

/// Key-value backed storefront routes (mounted under `/marketplace`)
pub fn marketplace() -> Router<AppState> {
    marketplace::routes()
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
