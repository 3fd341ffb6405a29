//! Shared harness: the full router over an in-memory database

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use paps_api_http::AppState;
use paps_core::application::{
    AuthService, BackofficeService, CatalogService, CourierService, MarketplaceService,
    RateLimiter, SubscriptionService,
};
use paps_core::port::id_provider::UuidProvider;
use paps_core::port::time_provider::SystemTimeProvider;
use paps_infra_security::{BcryptHasher, JwtTokenService};
use paps_infra_sqlite::{
    create_pool, run_migrations, SqliteAccountRepository, SqliteCatalogRepository, SqliteKvStore,
    SqliteSubscriptionRepository,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret123";

pub struct TestApp {
    pub state: AppState,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_rate_limit(10_000, 10_000).await
    }

    pub async fn with_rate_limit(burst: u32, rate_per_sec: u32) -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let time_provider = Arc::new(SystemTimeProvider);
        let id_provider = Arc::new(UuidProvider);
        let accounts = Arc::new(SqliteAccountRepository::new(pool.clone()));
        // Lowest bcrypt cost keeps the suite fast
        let hasher = Arc::new(BcryptHasher::new(4));
        let tokens = Arc::new(JwtTokenService::new("integration-secret", 3600));

        let auth = Arc::new(AuthService::new(
            accounts.clone(),
            accounts.clone(),
            hasher.clone(),
            tokens,
            id_provider.clone(),
            time_provider.clone(),
        ));
        let catalog = Arc::new(CatalogService::new(
            Arc::new(SqliteCatalogRepository::new(pool.clone())),
            id_provider.clone(),
            time_provider.clone(),
        ));
        let couriers = Arc::new(CourierService::new(
            accounts.clone(),
            accounts.clone(),
            hasher,
            id_provider.clone(),
            time_provider.clone(),
        ));
        let subscriptions = Arc::new(SubscriptionService::new(
            Arc::new(SqliteSubscriptionRepository::new(pool.clone())),
            accounts.clone(),
            id_provider.clone(),
            time_provider.clone(),
            5000.0,
        ));
        let marketplace = Arc::new(MarketplaceService::new(
            Arc::new(SqliteKvStore::new(pool.clone())),
            id_provider,
            time_provider,
        ));
        let backoffice = Arc::new(BackofficeService::new(
            accounts,
            marketplace.clone(),
            subscriptions.clone(),
        ));

        let state = AppState {
            auth,
            catalog,
            couriers,
            subscriptions,
            marketplace,
            backoffice,
            rate_limiter: Arc::new(RateLimiter::new(burst, rate_per_sec)),
        };
        Self { state, pool }
    }

    pub fn router(&self) -> Router {
        paps_api_http::router(self.state.clone())
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    /// Register a shop and sign its owner in; returns (token, user)
    pub async fn merchant(&self, email: &str) -> (String, Value) {
        let (status, _) = self
            .post(
                "/api/signup",
                None,
                json!({
                    "first_name": "Awa",
                    "last_name": "Diop",
                    "phone": "+221770000000",
                    "email": email,
                    "password": PASSWORD,
                    "shop_name": "Boutique Awa",
                    "address": "Dakar",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.sign_in(email).await
    }

    pub async fn sign_in(&self, email: &str) -> (String, Value) {
        let (status, body) = self
            .post(
                "/api/signin",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-in failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"].clone(),
        )
    }
}

/// The error envelope every failure carries
pub fn assert_error(body: &Value, status: StatusCode) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["status"], status.as_u16());
    assert!(body["error"]["message"].is_string());
    assert!(body["error"]["timestamp"].is_string());
}
