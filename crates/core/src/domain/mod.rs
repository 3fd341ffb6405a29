// Domain Layer - Pure business logic and entities

pub mod account;
pub mod catalog;
pub mod error;
pub mod order;
pub mod stats;
pub mod store;
pub mod subscription;

// Re-exports
pub use account::{AccountStatus, Courier, CourierProfile, Merchant, Role, User, UserProfile};
pub use catalog::{Category, CategoryDetail, Product, ProductPatch};
pub use error::DomainError;
pub use order::{DeliveryProof, Order, OrderItem, OrderStatus};
pub use stats::{BackofficeStats, MerchantDashboardStats, MerchantSummary, LOW_STOCK_THRESHOLD};
pub use store::{DeliveryPerson, PresenceStatus, StoreInfo, StoreProduct};
pub use subscription::{Subscription, SubscriptionStatus, DEFAULT_SUBSCRIPTION_PRICE};

/// Entity identifier (UUID v4 for relational records, prefixed millis for marketplace documents)
pub type EntityId = String;
