//! JSON-RPC Server
//!
//! Backoffice admin API over TCP, bound to localhost by default.

use crate::handler::RpcHandler;
use crate::types::{MerchantStatusRequest, MerchantsListRequest, StatsRequest, SweepRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use paps_core::application::{BackofficeService, RateLimiter};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        backoffice: Arc<BackofficeService>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(backoffice, rate_limiter)),
        }
    }

    /// Method table, separate from the transport so it can be called in-process
    pub fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: StatsRequest = params.parse().unwrap_or_default();
                    handler.stats(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.merchants.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: MerchantsListRequest = params.parse().unwrap_or_default();
                    handler.list_merchants(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.merchant.status.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: MerchantStatusRequest = params.parse()?;
                    handler.set_merchant_status(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.subscriptions.sweep.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: SweepRequest = params.parse().unwrap_or_default();
                    handler.sweep(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let module = self.module()?;
        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        info!("JSON-RPC server started successfully");
        Ok(server.start(module))
    }
}
