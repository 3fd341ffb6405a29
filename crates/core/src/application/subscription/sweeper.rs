// Background expiry of ended subscriptions

use super::SubscriptionService;
use crate::application::shutdown::ShutdownToken;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Periodically marks ended subscriptions inactive
pub struct SubscriptionSweeper {
    service: Arc<SubscriptionService>,
    interval_secs: u64,
}

impl SubscriptionSweeper {
    pub fn new(service: Arc<SubscriptionService>, interval_secs: u64) -> Self {
        Self {
            service,
            interval_secs: interval_secs.max(1),
        }
    }

    /// Run until shutdown (spawn with `tokio::spawn`)
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.interval_secs,
            "Subscription sweeper started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_secs));

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.run_now().await {
                        error!(error = ?e, "Subscription sweep failed");
                    }
                }
                _ = shutdown.wait() => {
                    info!("Subscription sweeper stopping");
                    break;
                }
            }
        }
    }

    /// Sweep immediately
    pub async fn run_now(&self) -> Result<u64> {
        let expired = self.service.expire_ended().await?;
        if expired > 0 {
            info!(expired, "Expired subscriptions deactivated");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shutdown::shutdown_channel;
    use crate::application::test_support::{
        FixedClock, InMemoryAccounts, InMemorySubscriptions, SequentialIds,
    };
    use chrono::Utc;

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown() {
        let service = Arc::new(SubscriptionService::new(
            Arc::new(InMemorySubscriptions::default()),
            Arc::new(InMemoryAccounts::default()),
            Arc::new(SequentialIds::default()),
            Arc::new(FixedClock::at(Utc::now())),
            5000.0,
        ));
        let sweeper = SubscriptionSweeper::new(service, 3600);
        assert_eq!(sweeper.run_now().await.unwrap(), 0);

        let (tx, token) = shutdown_channel();
        let handle = tokio::spawn(sweeper.run(token));
        tx.shutdown();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
