//! RPC Method Handlers

use crate::error::{throttled, to_rpc_error};
use crate::types::{
    MerchantStatusRequest, MerchantStatusResponse, MerchantsListRequest, MerchantsListResponse,
    StatsRequest, StatsResponse, SweepRequest, SweepResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use paps_core::application::{BackofficeService, RateLimiter};
use paps_core::domain::AccountStatus;
use paps_core::AppError;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    backoffice: Arc<BackofficeService>,
    rate_limiter: Arc<RateLimiter>,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(backoffice: Arc<BackofficeService>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            backoffice,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    fn admit(&self) -> Result<(), ErrorObjectOwned> {
        if self.rate_limiter.try_acquire() {
            Ok(())
        } else {
            Err(throttled())
        }
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        self.admit()?;
        let stats = self.backoffice.stats().await.map_err(to_rpc_error)?;
        Ok(StatsResponse {
            stats,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }

    /// admin.merchants.list.v1
    pub async fn list_merchants(
        &self,
        _params: MerchantsListRequest,
    ) -> Result<MerchantsListResponse, ErrorObjectOwned> {
        self.admit()?;
        let merchants = self
            .backoffice
            .list_merchants()
            .await
            .map_err(to_rpc_error)?;
        Ok(MerchantsListResponse { merchants })
    }

    /// admin.merchant.status.v1
    pub async fn set_merchant_status(
        &self,
        params: MerchantStatusRequest,
    ) -> Result<MerchantStatusResponse, ErrorObjectOwned> {
        self.admit()?;
        let status: AccountStatus = params
            .status
            .parse()
            .map_err(|e| to_rpc_error(AppError::Domain(e)))?;

        let merchant = self
            .backoffice
            .set_merchant_status(&params.merchant_id, status)
            .await
            .map_err(to_rpc_error)?;

        Ok(MerchantStatusResponse {
            merchant_id: merchant.id,
            status: merchant.status.to_string(),
        })
    }

    /// admin.subscriptions.sweep.v1
    pub async fn sweep(&self, _params: SweepRequest) -> Result<SweepResponse, ErrorObjectOwned> {
        self.admit()?;
        let expired = self
            .backoffice
            .sweep_subscriptions()
            .await
            .map_err(to_rpc_error)?;
        info!(expired, "Manual subscription sweep");
        Ok(SweepResponse { expired })
    }
}
