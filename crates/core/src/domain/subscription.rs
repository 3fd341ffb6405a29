// Subscription Domain Model

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Monthly price charged to merchants (XOF)
pub const DEFAULT_SUBSCRIPTION_PRICE: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = super::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            other => Err(super::DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: EntityId,
    pub merchant_id: EntityId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: SubscriptionStatus,
    pub price: f64,
}

impl Subscription {
    /// One calendar month starting at `start`
    pub fn monthly(
        id: impl Into<String>,
        merchant_id: impl Into<String>,
        start: DateTime<Utc>,
        price: f64,
    ) -> Self {
        // checked_add_months only fails past year 262143
        let end = start.checked_add_months(Months::new(1)).unwrap_or(start);
        Self {
            id: id.into(),
            merchant_id: merchant_id.into(),
            start,
            end,
            status: SubscriptionStatus::Active,
            price,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_monthly_subscription_spans_one_month() {
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        let sub = Subscription::monthly("s1", "m1", start, DEFAULT_SUBSCRIPTION_PRICE);
        // clamped to the last day of February
        assert_eq!(sub.end, Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap());
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.price, 5000.0);
    }

    #[test]
    fn test_expiry() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let sub = Subscription::monthly("s1", "m1", start, 5000.0);
        assert!(!sub.is_expired(Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap()));
        assert!(sub.is_expired(Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap()));
    }
}
