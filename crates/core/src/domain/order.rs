// Order Domain Model (marketplace orders and their delivery flow)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::EntityId;

/// Order status (linear delivery flow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Accepted,
    EnRoutePickup,
    PickedUp,
    EnRouteDelivery,
    Delivered,
}

impl OrderStatus {
    pub const FLOW: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Assigned,
        OrderStatus::Accepted,
        OrderStatus::EnRoutePickup,
        OrderStatus::PickedUp,
        OrderStatus::EnRouteDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Accepted => "accepted",
            OrderStatus::EnRoutePickup => "en_route_pickup",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::EnRouteDelivery => "en_route_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Successor in the delivery flow
    pub fn next(&self) -> Option<OrderStatus> {
        let idx = Self::FLOW.iter().position(|s| s == self)?;
        Self::FLOW.get(idx + 1).copied()
    }

    /// Statuses a courier may move an order to from this one
    pub fn courier_actions(&self) -> Vec<OrderStatus> {
        match self {
            OrderStatus::Accepted
            | OrderStatus::EnRoutePickup
            | OrderStatus::PickedUp
            | OrderStatus::EnRouteDelivery => self.next().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Courier is between acceptance and hand-over
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            OrderStatus::Accepted
                | OrderStatus::EnRoutePickup
                | OrderStatus::PickedUp
                | OrderStatus::EnRouteDelivery
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::FLOW
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::UnknownStatus(s.to_string()))
    }
}

/// Line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: EntityId,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Proof of delivery submitted by the courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryProof {
    pub pin: String,
    /// Photo as a data URL
    pub photo: String,
    pub submitted_at: DateTime<Utc>,
}

/// Marketplace order document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    pub merchant_id: EntityId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_person_id: Option<EntityId>,

    // One timestamp per status reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_route_pickup_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_route_delivery_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,

    /// Code the customer hands to the courier at delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_pin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<DeliveryProof>,
}

impl Order {
    /// New pending order
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        merchant_id: impl Into<String>,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        customer_address: impl Into<String>,
        items: Vec<OrderItem>,
        total: f64,
    ) -> Self {
        Self {
            id: id.into(),
            merchant_id: merchant_id.into(),
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            customer_address: customer_address.into(),
            items,
            total,
            status: OrderStatus::Pending,
            created_at,
            delivery_person_id: None,
            assigned_at: None,
            accepted_at: None,
            en_route_pickup_at: None,
            picked_up_at: None,
            en_route_delivery_at: None,
            delivered_at: None,
            delivery_pin: None,
            proof: None,
        }
    }

    /// Timestamp recorded when `status` was reached
    pub fn reached_at(&self, status: OrderStatus) -> Option<DateTime<Utc>> {
        match status {
            OrderStatus::Pending => Some(self.created_at),
            OrderStatus::Assigned => self.assigned_at,
            OrderStatus::Accepted => self.accepted_at,
            OrderStatus::EnRoutePickup => self.en_route_pickup_at,
            OrderStatus::PickedUp => self.picked_up_at,
            OrderStatus::EnRouteDelivery => self.en_route_delivery_at,
            OrderStatus::Delivered => self.delivered_at,
        }
    }

    fn stamp(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        let slot = match status {
            OrderStatus::Pending => return,
            OrderStatus::Assigned => &mut self.assigned_at,
            OrderStatus::Accepted => &mut self.accepted_at,
            OrderStatus::EnRoutePickup => &mut self.en_route_pickup_at,
            OrderStatus::PickedUp => &mut self.picked_up_at,
            OrderStatus::EnRouteDelivery => &mut self.en_route_delivery_at,
            OrderStatus::Delivered => &mut self.delivered_at,
        };
        *slot = Some(now);
    }

    /// Hand the order to a delivery person (reassignment allowed until accepted)
    pub fn assign(&mut self, delivery_person_id: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        if !matches!(self.status, OrderStatus::Pending | OrderStatus::Assigned) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: OrderStatus::Assigned.to_string(),
            });
        }
        self.delivery_person_id = Some(delivery_person_id.into());
        self.status = OrderStatus::Assigned;
        self.stamp(OrderStatus::Assigned, now);
        Ok(())
    }

    /// Move to `target`; repeating the current status is a no-op
    ///
    /// Returns true when the order actually changed.
    pub fn transition_to(&mut self, target: OrderStatus, now: DateTime<Utc>) -> Result<bool> {
        if target == self.status {
            return Ok(false);
        }
        if self.status.next() != Some(target) || target == OrderStatus::Assigned {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.stamp(target, now);
        Ok(true)
    }

    /// Record the courier's proof of delivery
    pub fn attach_proof(&mut self, pin: &str, photo: &str, now: DateTime<Utc>) -> Result<()> {
        if !matches!(
            self.status,
            OrderStatus::EnRouteDelivery | OrderStatus::Delivered
        ) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: "proof".to_string(),
            });
        }
        if pin.trim().is_empty() || photo.trim().is_empty() {
            return Err(DomainError::Validation(
                "Veuillez saisir le code PIN et la photo.".to_string(),
            ));
        }
        if let Some(expected) = &self.delivery_pin {
            if expected != pin.trim() {
                return Err(DomainError::Validation("Code PIN incorrect".to_string()));
            }
        }
        self.proof = Some(DeliveryProof {
            pin: pin.trim().to_string(),
            photo: photo.to_string(),
            submitted_at: now,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::new(
            "order_1",
            Utc::now(),
            "m1",
            "Awa",
            "770000000",
            "Dakar",
            vec![OrderItem {
                product_id: "p1".into(),
                product_name: "Thiakry".into(),
                quantity: 2,
                price: 1500.0,
            }],
            3000.0,
        )
    }

    #[test]
    fn test_flow_successors() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Assigned));
        assert_eq!(
            OrderStatus::EnRouteDelivery.next(),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn test_courier_actions() {
        assert!(OrderStatus::Pending.courier_actions().is_empty());
        assert!(OrderStatus::Assigned.courier_actions().is_empty());
        assert_eq!(
            OrderStatus::Accepted.courier_actions(),
            vec![OrderStatus::EnRoutePickup]
        );
        assert!(OrderStatus::Delivered.courier_actions().is_empty());
    }

    #[test]
    fn test_status_parse_and_serialize() {
        let s: OrderStatus = "en_route_pickup".parse().unwrap();
        assert_eq!(s, OrderStatus::EnRoutePickup);
        assert_eq!(
            serde_json::to_value(OrderStatus::PickedUp).unwrap(),
            "picked_up"
        );
        assert!("in_transit".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_full_delivery_flow() {
        let mut o = order();
        let now = Utc::now();
        o.assign("delivery_1", now).unwrap();
        assert_eq!(o.status, OrderStatus::Assigned);
        assert!(o.assigned_at.is_some());

        for target in [
            OrderStatus::Accepted,
            OrderStatus::EnRoutePickup,
            OrderStatus::PickedUp,
            OrderStatus::EnRouteDelivery,
            OrderStatus::Delivered,
        ] {
            assert!(o.transition_to(target, now).unwrap());
            assert_eq!(o.reached_at(target), Some(now));
        }
        assert_eq!(o.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_skipping_a_step_is_rejected() {
        let mut o = order();
        o.assign("d1", Utc::now()).unwrap();
        let err = o
            .transition_to(OrderStatus::PickedUp, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatusTransition { .. }));
        assert_eq!(o.status, OrderStatus::Assigned);
    }

    #[test]
    fn test_repeated_status_is_noop() {
        let mut o = order();
        let first = Utc::now();
        o.assign("d1", first).unwrap();
        o.transition_to(OrderStatus::Accepted, first).unwrap();
        let later = first + chrono::Duration::seconds(30);
        assert!(!o.transition_to(OrderStatus::Accepted, later).unwrap());
        assert_eq!(o.accepted_at, Some(first));
    }

    #[test]
    fn test_cannot_reassign_after_acceptance() {
        let mut o = order();
        o.assign("d1", Utc::now()).unwrap();
        o.assign("d2", Utc::now()).unwrap();
        assert_eq!(o.delivery_person_id.as_deref(), Some("d2"));
        o.transition_to(OrderStatus::Accepted, Utc::now()).unwrap();
        assert!(o.assign("d3", Utc::now()).is_err());
    }

    #[test]
    fn test_proof_requires_matching_pin() {
        let mut o = order();
        o.delivery_pin = Some("4821".into());
        o.status = OrderStatus::EnRouteDelivery;
        assert!(o.attach_proof("0000", "data:image/png;base64,AA", Utc::now()).is_err());
        assert!(o.attach_proof("4821", "", Utc::now()).is_err());
        o.attach_proof(" 4821 ", "data:image/png;base64,AA", Utc::now())
            .unwrap();
        assert_eq!(o.proof.as_ref().unwrap().pin, "4821");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(order()).unwrap();
        assert_eq!(json["customerName"], "Awa");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["status"], "pending");
        assert!(json.get("assignedAt").is_none());
    }
}
