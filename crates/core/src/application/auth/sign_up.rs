// Merchant Sign-Up Use Case

use crate::domain::{Merchant, Role, User};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, PasswordHasher, TimeProvider, TransactionalAccountRepository};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Sign-up request (shop owner + shop)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    #[serde(alias = "prenom", default)]
    pub first_name: String,
    #[serde(alias = "nom", default)]
    pub last_name: String,
    #[serde(alias = "telephone", default)]
    pub phone: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(alias = "nom_boutique", default)]
    pub shop_name: String,
    #[serde(alias = "adress", default)]
    pub address: String,
}

pub(crate) fn validate_request(req: &SignUpRequest) -> Result<()> {
    if req.email.trim().is_empty() {
        return Err(AppError::Validation("L'email est requis".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Le mot de passe est requis".to_string()));
    }
    if req.shop_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Le nom de la boutique est requis".to_string(),
        ));
    }
    Ok(())
}

/// Create the merchant and its `commercant` user atomically
pub async fn execute(
    accounts: &dyn TransactionalAccountRepository,
    hasher: &dyn PasswordHasher,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: SignUpRequest,
) -> Result<User> {
    validate_request(&req)?;
    let email = req.email.trim().to_string();

    // Hash before opening the transaction (bcrypt is slow)
    let password_hash = hasher.hash(&req.password).await?;

    let mut tx = accounts.begin_transaction().await?;

    if tx.email_exists(&email).await? {
        tx.rollback().await?;
        return Err(AppError::Conflict("Cet email est déjà utilisé.".to_string()));
    }

    let now = time_provider.now();
    let merchant = Merchant::new(
        id_provider.generate_id(),
        now,
        req.shop_name.trim(),
        req.address.trim(),
    );
    tx.insert_merchant(&merchant).await?;

    let mut user = User::new(
        id_provider.generate_id(),
        now,
        Role::Commercant,
        email,
        password_hash,
    );
    user.first_name = req.first_name.trim().to_string();
    user.last_name = req.last_name.trim().to_string();
    user.phone = req.phone.filter(|p| !p.trim().is_empty());
    user.merchant_id = Some(merchant.id.clone());
    tx.insert_user(&user).await?;

    tx.commit().await?;

    info!(user_id = %user.id, merchant_id = %merchant.id, "Merchant signed up");
    Ok(user)
}
