// Courier Service - delivery riders attached to merchants

use crate::domain::{Courier, CourierProfile, EntityId, Role, User, UserProfile};
use crate::error::{AppError, Result};
use crate::port::{
    AccountRepository, IdProvider, PasswordHasher, TimeProvider, TransactionalAccountRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourier {
    #[serde(alias = "prenom", default)]
    pub first_name: String,
    #[serde(alias = "nom", default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "telephone", default)]
    pub phone: Option<String>,
    #[serde(alias = "commercant_id", default)]
    pub merchant_id: Option<EntityId>,
}

/// Editable courier fields; absent ones are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierUpdate {
    #[serde(alias = "prenom")]
    pub first_name: Option<String>,
    #[serde(alias = "nom")]
    pub last_name: Option<String>,
    #[serde(alias = "telephone")]
    pub phone: Option<String>,
    #[serde(alias = "commercant_id")]
    pub merchant_id: Option<EntityId>,
}

pub struct CourierService {
    tx_accounts: Arc<dyn TransactionalAccountRepository>,
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CourierService {
    pub fn new(
        tx_accounts: Arc<dyn TransactionalAccountRepository>,
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_accounts,
            accounts,
            hasher,
            id_provider,
            time_provider,
        }
    }

    /// Create the courier record and its `livreur` user together
    pub async fn create_courier(&self, req: NewCourier) -> Result<(Courier, User)> {
        let email = req.email.trim().to_string();
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "L'email et le mot de passe sont requis".to_string(),
            ));
        }
        if let Some(merchant_id) = &req.merchant_id {
            if self.accounts.find_merchant(merchant_id).await?.is_none() {
                return Err(AppError::Validation("Commerçant introuvable".to_string()));
            }
        }

        let password_hash = self.hasher.hash(&req.password).await?;
        let mut tx = self.tx_accounts.begin_transaction().await?;

        if tx.email_exists(&email).await? {
            tx.rollback().await?;
            return Err(AppError::Conflict("Cet email est déjà utilisé.".to_string()));
        }

        let now = self.time_provider.now();
        let courier = Courier {
            id: self.id_provider.generate_id(),
            merchant_id: req.merchant_id.clone(),
            created_at: now,
        };
        tx.insert_courier(&courier).await?;

        let mut user = User::new(
            self.id_provider.generate_id(),
            now,
            Role::Livreur,
            email,
            password_hash,
        );
        user.first_name = req.first_name.trim().to_string();
        user.last_name = req.last_name.trim().to_string();
        user.phone = req.phone;
        user.courier_id = Some(courier.id.clone());
        user.merchant_id = req.merchant_id;
        tx.insert_user(&user).await?;

        tx.commit().await?;

        info!(courier_id = %courier.id, user_id = %user.id, "Courier created");
        Ok((courier, user))
    }

    /// Courier record with its user's public profile
    pub async fn get_courier(&self, id: &str) -> Result<CourierProfile> {
        let courier = self
            .accounts
            .find_courier(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Livreur non trouvé".to_string()))?;
        let user = self
            .accounts
            .find_user_by_courier(id)
            .await?
            .map(|u| u.profile());
        Ok(CourierProfile { courier, user })
    }

    /// Update a courier's user account (`id` is the user ID)
    pub async fn update_courier(&self, id: &str, update: CourierUpdate) -> Result<User> {
        let mut user = self.find_courier_user(id, "Livreur non trouvé ou incorrect.").await?;

        if let Some(first_name) = update.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(merchant_id) = update.merchant_id {
            if self.accounts.find_merchant(&merchant_id).await?.is_none() {
                return Err(AppError::Validation("Commerçant introuvable".to_string()));
            }
            if let Some(courier_id) = &user.courier_id {
                self.accounts
                    .set_courier_merchant(courier_id, &merchant_id)
                    .await?;
            }
            user.merchant_id = Some(merchant_id);
        }

        self.accounts.update_user(&user).await?;
        Ok(user)
    }

    /// Delete a courier's user account (`id` is the user ID)
    pub async fn delete_courier(&self, id: &str) -> Result<()> {
        self.find_courier_user(id, "Livreur non trouvé").await?;
        self.accounts.delete_user(id).await?;
        info!(user_id = %id, "Courier deleted");
        Ok(())
    }

    pub async fn list_couriers(&self) -> Result<Vec<Courier>> {
        self.accounts.list_couriers().await
    }

    pub async fn list_merchant_couriers(&self, merchant_id: &str) -> Result<Vec<UserProfile>> {
        Ok(self
            .accounts
            .list_courier_users(merchant_id)
            .await?
            .iter()
            .map(User::profile)
            .collect())
    }

    async fn find_courier_user(&self, id: &str, not_found: &str) -> Result<User> {
        self.accounts
            .find_user(id)
            .await?
            .filter(|u| u.role == Role::Livreur)
            .ok_or_else(|| AppError::NotFound(not_found.to_string()))
    }
}
