// Storefront documents (key-value backed marketplace)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Product as listed on the public storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    pub id: EntityId,
    pub merchant_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    pub stock: i64,
    #[serde(default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreProduct {
    /// Remove `quantity` units, never going below zero
    pub fn take_stock(&mut self, quantity: i64) {
        self.stock = (self.stock - quantity.max(0)).max(0);
    }
}

/// Courier presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
}

/// Delivery person registered by a merchant on the storefront side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPerson {
    pub id: EntityId,
    pub merchant_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub status: PresenceStatus,
    pub created_at: DateTime<Utc>,
}

/// Store settings shown in the storefront header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub header_image: String,
}

impl StoreInfo {
    /// Placeholder used when a merchant never saved settings
    pub fn placeholder(merchant_id: impl Into<String>) -> Self {
        Self {
            id: merchant_id.into(),
            name: "Commerce Local".to_string(),
            description: String::new(),
            logo: String::new(),
            header_image: String::new(),
        }
    }
}
