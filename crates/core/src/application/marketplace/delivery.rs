// Order assignment and courier-side order updates

use super::{keys, MarketplaceService};
use crate::domain::{DeliveryPerson, Order, OrderStatus, PresenceStatus};
use crate::error::{AppError, Result};
use tracing::{info, warn};

fn order_not_found() -> AppError {
    AppError::NotFound("Commande non trouvée".to_string())
}

impl MarketplaceService {
    /// Merchant's orders, newest first
    pub async fn list_orders(&self, merchant_id: &str) -> Result<Vec<Order>> {
        keys::check(&[merchant_id])?;
        let mut orders: Vec<Order> = self.kv.list_json(&keys::orders_of(merchant_id)).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Hand an order to a courier (or move it to another one before acceptance)
    pub async fn assign_order(
        &self,
        merchant_id: &str,
        order_id: &str,
        delivery_person_id: &str,
    ) -> Result<Order> {
        if delivery_person_id.trim().is_empty() {
            return Err(AppError::Validation("Le livreur est requis".to_string()));
        }
        keys::check(&[merchant_id, order_id, delivery_person_id])?;
        let mut order: Order = self
            .kv
            .get_json(&keys::order(merchant_id, order_id))
            .await?
            .ok_or_else(order_not_found)?;

        let previous = order.delivery_person_id.clone();
        order.assign(delivery_person_id, self.time_provider.now())?;

        if let Some(previous) = previous.filter(|p| p != delivery_person_id) {
            self.kv.del(&keys::delivery(&previous, order_id)).await?;
            info!(order_id, from = %previous, to = %delivery_person_id, "Order reassigned");
        }
        self.write_order(&order).await?;

        info!(merchant_id, order_id, delivery_person_id, "Order assigned");
        Ok(order)
    }

    /// Orders currently assigned to a courier
    pub async fn courier_orders(&self, courier_id: &str) -> Result<Vec<Order>> {
        keys::check(&[courier_id])?;
        let mut orders: Vec<Order> = self.kv.list_json(&keys::deliveries_of(courier_id)).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Set courier presence; couriers unknown to the storefront are ignored
    pub async fn set_presence(
        &self,
        courier_id: &str,
        status: PresenceStatus,
    ) -> Result<Option<DeliveryPerson>> {
        keys::check(&[courier_id])?;
        let people: Vec<DeliveryPerson> = self.kv.list_json(keys::ALL_DELIVERY_PEOPLE).await?;
        let Some(mut person) = people.into_iter().find(|p| p.id == courier_id) else {
            warn!(courier_id, "Presence update for unknown delivery person");
            return Ok(None);
        };

        person.status = status;
        self.kv
            .set_json(&keys::delivery_person(&person.merchant_id, courier_id), &person)
            .await?;
        Ok(Some(person))
    }

    pub async fn accept_order(&self, courier_id: &str, order_id: &str) -> Result<Order> {
        self.update_order_status(courier_id, order_id, OrderStatus::Accepted)
            .await
    }

    /// Move the courier's order one step along the delivery flow
    ///
    /// Sending the current status again changes nothing, so a replayed
    /// offline action is harmless.
    pub async fn update_order_status(
        &self,
        courier_id: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order> {
        let mut order = self.courier_order(courier_id, order_id).await?;

        if order.transition_to(status, self.time_provider.now())? {
            self.write_order(&order).await?;
            info!(courier_id, order_id, status = %status, "Order status updated");
        }
        Ok(order)
    }

    /// Record PIN and photo handed over at delivery
    pub async fn submit_proof(
        &self,
        courier_id: &str,
        order_id: &str,
        pin: &str,
        photo: &str,
    ) -> Result<Order> {
        let mut order = self.courier_order(courier_id, order_id).await?;
        order.attach_proof(pin, photo, self.time_provider.now())?;
        self.write_order(&order).await?;

        info!(courier_id, order_id, "Delivery proof recorded");
        Ok(order)
    }

    async fn courier_order(&self, courier_id: &str, order_id: &str) -> Result<Order> {
        keys::check(&[courier_id, order_id])?;
        self.kv
            .get_json(&keys::delivery(courier_id, order_id))
            .await?
            .ok_or_else(order_not_found)
    }

    /// Write the merchant copy and, once assigned, the courier copy
    async fn write_order(&self, order: &Order) -> Result<()> {
        self.kv
            .set_json(&keys::order(&order.merchant_id, &order.id), order)
            .await?;
        if let Some(courier_id) = &order.delivery_person_id {
            self.kv
                .set_json(&keys::delivery(courier_id, &order.id), order)
                .await?;
        }
        Ok(())
    }
}
