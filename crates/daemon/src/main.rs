//! PAPS Marketplace - Server Entry Point

mod config;
mod logging;
mod telemetry;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use config::Settings;
use paps_api_http::AppState;
use paps_api_rpc::{RpcServer, RpcServerConfig};
use paps_core::application::{
    shutdown_channel, AuthService, BackofficeService, CatalogService, CourierService,
    MarketplaceService, RateLimiter, SubscriptionService, SubscriptionSweeper,
};
use paps_core::port::id_provider::UuidProvider;
use paps_core::port::time_provider::SystemTimeProvider;
use paps_infra_security::{BcryptHasher, JwtTokenService};
use paps_infra_sqlite::{
    create_pool, database_url, run_migrations, SqliteAccountRepository, SqliteCatalogRepository,
    SqliteKvStore, SqliteSubscriptionRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let settings = Settings::load()?;
    let _log_guard = logging::init(&settings)?;

    info!("PAPS Marketplace v{} starting...", VERSION);
    if settings.uses_dev_secret() {
        warn!("PAPS_JWT_SECRET not set; using the development secret");
    }

    // 2. Database
    if settings.db_path != ":memory:" {
        if let Some(dir) = Path::new(&settings.db_path).parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }
    }
    info!(db_path = %settings.db_path, "Initializing database...");
    let pool = create_pool(&database_url(&settings.db_path))
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 3. Dependency wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let accounts = Arc::new(SqliteAccountRepository::new(pool.clone()));
    let hasher = Arc::new(BcryptHasher::new(settings.bcrypt_cost));
    let tokens = Arc::new(JwtTokenService::new(
        &settings.jwt_secret,
        settings.token_ttl_secs,
    ));

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
        settings.subscription_price,
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

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // 4. REST API
    let state = AppState {
        auth,
        catalog,
        couriers,
        subscriptions: subscriptions.clone(),
        marketplace,
        backoffice: backoffice.clone(),
        rate_limiter: Arc::new(RateLimiter::new(
            settings.rate_limit_burst,
            settings.rate_limit_rate,
        )),
    };
    let http_addr = format!("{}:{}", settings.http_host, settings.http_port);
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Cannot bind HTTP API on {}", http_addr))?;
    let http_handle = tokio::spawn(paps_api_http::serve(listener, state, shutdown_rx.clone()));

    // 5. Back-office JSON-RPC
    let rpc_server = RpcServer::new(
        RpcServerConfig {
            host: settings.rpc_host.clone(),
            port: settings.rpc_port,
        },
        backoffice,
        Arc::new(RateLimiter::new(
            settings.rate_limit_burst,
            settings.rate_limit_rate,
        )),
    );
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Subscription sweeper
    let sweeper = SubscriptionSweeper::new(subscriptions, settings.sweep_interval_secs);
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    shutdown_tx.shutdown();
    if let Err(e) = rpc_handle.stop() {
        warn!(error = %e, "RPC server already stopped");
    }

    match tokio::time::timeout(Duration::from_secs(5), http_handle).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!(error = %e, "HTTP server failed"),
        Ok(Err(e)) => error!(error = %e, "HTTP server task panicked"),
        Err(_) => warn!("HTTP server did not drain within 5s"),
    }
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;

    pool.close().await;
    telemetry::shutdown();
    info!("Shutdown complete.");

    Ok(())
}
