// Auth Service - sign-up, sign-in and request authentication

pub mod sign_in;
pub mod sign_up;

pub use sign_in::{SignInRequest, SignInResponse};
pub use sign_up::SignUpRequest;

use crate::domain::{EntityId, Role, User, UserProfile};
use crate::error::{AppError, Result};
use crate::port::{
    AccountRepository, IdProvider, PasswordHasher, TimeProvider, TokenService,
    TransactionalAccountRepository,
};
use std::sync::Arc;
use tracing::debug;

/// Authenticated merchant: the user plus the shop it runs
#[derive(Debug, Clone)]
pub struct MerchantContext {
    pub user: User,
    pub merchant_id: EntityId,
}

pub struct AuthService {
    tx_accounts: Arc<dyn TransactionalAccountRepository>,
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl AuthService {
    pub fn new(
        tx_accounts: Arc<dyn TransactionalAccountRepository>,
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_accounts,
            accounts,
            hasher,
            tokens,
            id_provider,
            time_provider,
        }
    }

    pub async fn sign_up_merchant(&self, req: SignUpRequest) -> Result<User> {
        sign_up::execute(
            self.tx_accounts.as_ref(),
            self.hasher.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    pub async fn sign_in(&self, req: SignInRequest) -> Result<SignInResponse> {
        sign_in::execute(
            self.accounts.as_ref(),
            self.hasher.as_ref(),
            self.tokens.as_ref(),
            req,
        )
        .await
    }

    /// Resolve a token given in a URL to the user's public profile
    ///
    /// Invalid tokens are `Forbidden` here, unlike the bearer path.
    pub async fn verify_token(&self, token: &str) -> Result<UserProfile> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| AppError::Forbidden("Token invalide".to_string()))?;
        let id = claims
            .id
            .ok_or_else(|| AppError::Forbidden("Token invalide".to_string()))?;

        let user = self
            .accounts
            .find_user(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé.".to_string()))?;
        Ok(user.profile())
    }

    /// Bearer-token authentication for protected routes
    pub async fn authenticate(&self, bearer: Option<&str>) -> Result<User> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Accès refusé. Aucun token fourni.".to_string())
            })?;

        let claims = self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AppError::Unauthorized("Token invalide".to_string())
        })?;

        let user = match (claims.id, claims.email) {
            (Some(id), _) => self.accounts.find_user(&id).await?,
            (None, Some(email)) => self.accounts.find_user_by_email(&email).await?,
            (None, None) => {
                return Err(AppError::Unauthorized(
                    "Token invalide. ID ou email utilisateur non trouvé.".to_string(),
                ))
            }
        };
        let user =
            user.ok_or_else(|| AppError::Unauthorized("Utilisateur non trouvé.".to_string()))?;

        if !user.status.is_active() {
            return Err(AppError::Unauthorized(
                "Compte utilisateur désactivé.".to_string(),
            ));
        }

        debug!(user_id = %user.id, role = %user.role, "Request authenticated");
        Ok(user)
    }

    /// `authenticate` restricted to merchants
    pub async fn authenticate_merchant(&self, bearer: Option<&str>) -> Result<MerchantContext> {
        let user = self.authenticate(bearer).await?;
        let ctx = require_merchant(user)?;
        ensure_shop_open(self.accounts.as_ref(), &ctx.user).await?;
        Ok(ctx)
    }
}

/// Merchants whose shop was deactivated or suspended are locked out
pub(crate) async fn ensure_shop_open(accounts: &dyn AccountRepository, user: &User) -> Result<()> {
    let Some(merchant_id) = user.merchant_id.as_deref() else {
        return Ok(());
    };
    if user.role != Role::Commercant {
        return Ok(());
    }
    match accounts.find_merchant(merchant_id).await? {
        Some(merchant) if !merchant.status.is_active() => {
            debug!(user_id = %user.id, merchant_id, status = %merchant.status, "Shop closed");
            Err(AppError::Forbidden(
                "Boutique désactivée ou suspendue.".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

pub fn require_merchant(user: User) -> Result<MerchantContext> {
    if user.role != Role::Commercant {
        return Err(AppError::Forbidden(
            "Accès réservé aux commerçants uniquement".to_string(),
        ));
    }
    let merchant_id = user.merchant_id.clone().ok_or_else(|| {
        AppError::InvalidState("Aucune boutique associée à ce compte".to_string())
    })?;
    Ok(MerchantContext { user, merchant_id })
}
