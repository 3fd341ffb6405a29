// Application Layer - Use Cases and Business Logic

pub mod auth;
pub mod backoffice;
pub mod catalog;
pub mod courier;
pub mod marketplace;
pub mod rate_limiter;
pub mod shutdown;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use auth::{AuthService, MerchantContext};
pub use backoffice::BackofficeService;
pub use catalog::CatalogService;
pub use courier::CourierService;
pub use marketplace::MarketplaceService;
pub use rate_limiter::RateLimiter;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use subscription::{SubscriptionService, SubscriptionSweeper};
