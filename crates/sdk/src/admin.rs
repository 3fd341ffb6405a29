//! Back-office JSON-RPC client

use crate::error::{Result, SdkError};
use crate::types::{
    MerchantRecord, MerchantStatusResponse, MerchantsEnvelope, PlatformStats, SweepResponse,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// PAPS back-office client
///
/// # Example
///
/// ```no_run
/// use paps_courier_sdk::AdminClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let admin = AdminClient::connect("http://127.0.0.1:9527").await?;
/// let stats = admin.stats().await?;
/// println!("{} deliveries, {:.1}% completed", stats.total_deliveries, stats.completion_rate);
/// # Ok(())
/// # }
/// ```
pub struct AdminClient {
    client: HttpClient,
}

impl AdminClient {
    /// Connect to the daemon's RPC endpoint (e.g. `http://127.0.0.1:9527`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn stats(&self) -> Result<PlatformStats> {
        let stats: PlatformStats = self.client.request("admin.stats.v1", rpc_params![]).await?;
        Ok(stats)
    }

    pub async fn merchants(&self) -> Result<Vec<MerchantRecord>> {
        let response: MerchantsEnvelope = self
            .client
            .request("admin.merchants.list.v1", rpc_params![])
            .await?;
        Ok(response.merchants)
    }

    /// `status` is `active`, `inactive` or `suspended`
    pub async fn set_merchant_status(
        &self,
        merchant_id: impl Into<String>,
        status: &str,
    ) -> Result<MerchantStatusResponse> {
        let mut params = ObjectParams::new();
        params.insert("merchant_id", merchant_id.into())?;
        params.insert("status", status)?;

        let response: MerchantStatusResponse = self
            .client
            .request("admin.merchant.status.v1", params)
            .await?;
        Ok(response)
    }

    /// Expire ended subscriptions now, returning how many were deactivated
    pub async fn sweep(&self) -> Result<u64> {
        let response: SweepResponse = self
            .client
            .request("admin.subscriptions.sweep.v1", rpc_params![])
            .await?;
        Ok(response.expired)
    }
}
