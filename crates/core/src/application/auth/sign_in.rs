// Sign-In Use Case

use crate::domain::User;
use crate::error::{AppError, Result};
use crate::port::{AccountRepository, PasswordHasher, TokenClaims, TokenService};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub message: String,
    pub token: String,
    pub user: User,
    /// Landing page for the user's role
    pub redirect: String,
}

const BAD_CREDENTIALS: &str = "Email ou mot de passe incorrect.";

pub async fn execute(
    accounts: &dyn AccountRepository,
    hasher: &dyn PasswordHasher,
    tokens: &dyn TokenService,
    req: SignInRequest,
) -> Result<SignInResponse> {
    let user = accounts
        .find_user_by_email(req.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !user.role.can_sign_in() {
        warn!(user_id = %user.id, role = %user.role, "Sign-in refused for role");
        return Err(AppError::Forbidden(
            "Accès réservé aux commerçants.".to_string(),
        ));
    }

    if !hasher.verify(&req.password, &user.password_hash).await? {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    if !user.status.is_active() {
        return Err(AppError::Unauthorized(
            "Compte utilisateur désactivé.".to_string(),
        ));
    }

    super::ensure_shop_open(accounts, &user).await?;

    let token = tokens.issue(&TokenClaims {
        id: Some(user.id.clone()),
        email: Some(user.email.clone()),
        role: Some(user.role),
    })?;

    info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok(SignInResponse {
        message: "Connexion réussie.".to_string(),
        token,
        redirect: user.role.landing_path().to_string(),
        user,
    })
}
