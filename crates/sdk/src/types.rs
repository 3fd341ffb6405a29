//! SDK Request/Response Types
//!
//! Mirror the marketplace documents and the back-office RPC types.

use serde::{Deserialize, Serialize};

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Order as seen by the courier it is assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierOrder {
    pub id: String,
    pub merchant_id: String,
    /// `pending`, `assigned`, `accepted`, `en_route_pickup`, `picked_up`,
    /// `en_route_delivery` or `delivered`
    pub status: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub delivery_person_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    pub orders: Vec<CourierOrder>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: CourierOrder,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// Per-merchant line of the platform statistics
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSummary {
    pub merchant_id: String,
    pub shop_name: String,
    pub status: String,
    pub total_orders: u64,
    pub total_revenue: f64,
}

/// Response from admin.stats.v1
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_deliveries: u64,
    pub completed_deliveries: u64,
    pub pending_deliveries: u64,
    pub total_revenue: f64,
    pub completion_rate: f64,
    pub average_delivery_minutes: Option<f64>,
    pub merchants: Vec<MerchantSummary>,
    #[serde(rename = "uptime_seconds")]
    pub uptime_seconds: u64,
}

/// Merchant row from admin.merchants.list.v1
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantRecord {
    pub id: String,
    pub shop_name: String,
    pub address: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MerchantsEnvelope {
    pub merchants: Vec<MerchantRecord>,
}

/// Response from admin.merchant.status.v1
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantStatusResponse {
    pub merchant_id: String,
    pub status: String,
}

/// Response from admin.subscriptions.sweep.v1
#[derive(Debug, Clone, Deserialize)]
pub struct SweepResponse {
    pub expired: u64,
}
