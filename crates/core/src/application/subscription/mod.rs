// Subscription Service - merchant monthly plans

mod sweeper;

pub use sweeper::SubscriptionSweeper;

use crate::domain::{Role, Subscription};
use crate::error::{AppError, Result};
use crate::port::{AccountRepository, IdProvider, SubscriptionRepository, TimeProvider};
use std::sync::Arc;
use tracing::info;

pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    accounts: Arc<dyn AccountRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    price: f64,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        accounts: Arc<dyn AccountRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        price: f64,
    ) -> Self {
        Self {
            subscriptions,
            accounts,
            id_provider,
            time_provider,
            price,
        }
    }

    /// Pay one month for the merchant behind `user_id`
    pub async fn pay(&self, user_id: &str) -> Result<Subscription> {
        let mut user = self
            .accounts
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé.".to_string()))?;
        if user.role != Role::Commercant {
            return Err(AppError::Forbidden(
                "Seuls les commerçants peuvent souscrire à un abonnement.".to_string(),
            ));
        }
        let merchant_id = user.merchant_id.clone().ok_or_else(|| {
            AppError::InvalidState("Aucune boutique associée à ce compte".to_string())
        })?;

        let subscription = Subscription::monthly(
            self.id_provider.generate_id(),
            merchant_id,
            self.time_provider.now(),
            self.price,
        );
        self.subscriptions.insert(&subscription).await?;

        user.subscription_id = Some(subscription.id.clone());
        self.accounts.update_user(&user).await?;

        info!(
            user_id,
            subscription_id = %subscription.id,
            end = %subscription.end,
            "Subscription paid"
        );
        Ok(subscription)
    }

    pub async fn history(&self, merchant_id: &str) -> Result<Vec<Subscription>> {
        self.subscriptions.list_by_merchant(merchant_id).await
    }

    /// Deactivate every subscription whose end has passed
    pub async fn expire_ended(&self) -> Result<u64> {
        self.subscriptions
            .expire_ended(self.time_provider.now())
            .await
    }
}
