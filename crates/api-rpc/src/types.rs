//! RPC Request/Response Types

use paps_core::domain::{BackofficeStats, Merchant};
use serde::{Deserialize, Serialize};

/// admin.stats.v1
#[derive(Debug, Default, Deserialize)]
pub struct StatsRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: BackofficeStats,
    pub uptime_seconds: u64,
}

/// admin.merchants.list.v1
#[derive(Debug, Default, Deserialize)]
pub struct MerchantsListRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantsListResponse {
    pub merchants: Vec<Merchant>,
}

/// admin.merchant.status.v1 - Activate or suspend a shop
#[derive(Debug, Deserialize)]
pub struct MerchantStatusRequest {
    pub merchant_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantStatusResponse {
    pub merchant_id: String,
    pub status: String,
}

/// admin.subscriptions.sweep.v1 - Expire ended subscriptions now
#[derive(Debug, Default, Deserialize)]
pub struct SweepRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub expired: u64,
}
