//! REST API Layer
//!
//! Serves the merchant back end under `/api` and the storefront,
//! courier and dashboard endpoints under `/marketplace`.

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use paps_core::application::ShutdownToken;
use tokio::net::TcpListener;
use tracing::info;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Full application router with CORS, tracing and throttling layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api())
        .nest("/marketplace", routes::marketplace())
        .fallback(routes::not_found)
        .layer(from_fn_with_state(state.clone(), middleware::throttle))
        .layer(from_fn(middleware::trace_requests))
        .layer(middleware::cors())
        .with_state(state)
}

/// Serve until the shutdown token fires
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: ShutdownToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP API listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
