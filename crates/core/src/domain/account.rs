// Account Domain Model (users, merchants, couriers)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Commercant,
    Livreur,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Commercant => "commercant",
            Role::Livreur => "livreur",
            Role::Admin => "admin",
        }
    }

    /// First page a freshly signed-in user lands on
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Commercant => "/admin/dashboard",
            Role::Livreur => "/agent/delivery",
            _ => "/home",
        }
    }

    /// Roles allowed to sign in to the back office
    pub fn can_sign_in(&self) -> bool {
        matches!(self, Role::Commercant | Role::Livreur)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = super::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "commercant" => Ok(Role::Commercant),
            "livreur" => Ok(Role::Livreur),
            "admin" => Ok(Role::Admin),
            other => Err(super::DomainError::Validation(format!(
                "Rôle inconnu: {}",
                other
            ))),
        }
    }
}

/// Account status (shared by users and merchants)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn is_active(&self) -> bool {
        *self == AccountStatus::Active
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = super::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(super::DomainError::Validation(format!(
                "Statut de compte inconnu: {}",
                other
            ))),
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub email: String,

    /// bcrypt hash, never sent over the wire
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub merchant_id: Option<EntityId>,
    pub courier_id: Option<EntityId>,
    pub client_id: Option<EntityId>,
    pub subscription_id: Option<EntityId>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    ///
    /// ID and timestamp are injected (see `IdProvider`/`TimeProvider`).
    pub fn new(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        role: Role,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            phone: None,
            email: email.into(),
            password_hash: password_hash.into(),
            merchant_id: None,
            courier_id: None,
            client_id: None,
            subscription_id: None,
            status: AccountStatus::Active,
            created_at,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            role: self.role,
            merchant_id: self.merchant_id.clone(),
        }
    }
}

/// Public projection of a user (what other accounts may see)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub role: Role,
    pub merchant_id: Option<EntityId>,
}

/// Merchant (shop) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Merchant {
    pub id: EntityId,
    pub shop_name: String,
    pub address: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Merchant {
    pub fn new(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        shop_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            shop_name: shop_name.into(),
            address: address.into(),
            status: AccountStatus::Active,
            created_at,
        }
    }
}

/// Courier (livreur) record, optionally attached to a merchant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    pub id: EntityId,
    pub merchant_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
}

/// Courier joined with its user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierProfile {
    #[serde(flatten)]
    pub courier: Courier,
    pub user: Option<UserProfile>,
}
