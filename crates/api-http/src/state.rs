use std::sync::Arc;

use paps_core::application::{
    AuthService, BackofficeService, CatalogService, CourierService, MarketplaceService,
    RateLimiter, SubscriptionService,
};

/// Shared handler state; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub couriers: Arc<CourierService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub marketplace: Arc<MarketplaceService>,
    pub backoffice: Arc<BackofficeService>,
    pub rate_limiter: Arc<RateLimiter>,
}
