// Backoffice Service - platform-wide view for administrators

use crate::application::marketplace::MarketplaceService;
use crate::application::subscription::SubscriptionService;
use crate::domain::{AccountStatus, BackofficeStats, Merchant};
use crate::error::{AppError, Result};
use crate::port::AccountRepository;
use std::sync::Arc;
use tracing::info;

pub struct BackofficeService {
    accounts: Arc<dyn AccountRepository>,
    marketplace: Arc<MarketplaceService>,
    subscriptions: Arc<SubscriptionService>,
}

impl BackofficeService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        marketplace: Arc<MarketplaceService>,
        subscriptions: Arc<SubscriptionService>,
    ) -> Self {
        Self {
            accounts,
            marketplace,
            subscriptions,
        }
    }

    pub async fn stats(&self) -> Result<BackofficeStats> {
        let merchants = self.accounts.list_merchants().await?;
        let orders = self.marketplace.all_orders().await?;
        Ok(BackofficeStats::compute(&merchants, &orders))
    }

    pub async fn list_merchants(&self) -> Result<Vec<Merchant>> {
        self.accounts.list_merchants().await
    }

    pub async fn set_merchant_status(
        &self,
        merchant_id: &str,
        status: AccountStatus,
    ) -> Result<Merchant> {
        let mut merchant = self
            .accounts
            .find_merchant(merchant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Commerçant {} introuvable", merchant_id)))?;

        self.accounts
            .set_merchant_status(&merchant.id, status)
            .await?;
        merchant.status = status;

        info!(merchant_id, status = %status, "Merchant status changed");
        Ok(merchant)
    }

    /// Run the subscription sweep on demand
    pub async fn sweep_subscriptions(&self) -> Result<u64> {
        self.subscriptions.expire_ended().await
    }
}
