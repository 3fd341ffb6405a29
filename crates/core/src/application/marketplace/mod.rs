// Marketplace Service - storefront, merchant orders and courier flows
//
// Documents live in the key-value store; see `keys` for the layout.
// An assigned order exists twice (merchant copy and courier copy) and
// every write goes to both.

mod delivery;
pub mod keys;

use crate::domain::{
    DeliveryPerson, EntityId, MerchantDashboardStats, Order, OrderItem, PresenceStatus, StoreInfo,
    StoreProduct,
};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, KvStore, TimeProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Product upsert request; an absent `id` creates a new product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDeliveryPerson {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Computed from the items when absent
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub header_image: String,
}

/// What a customer sees when opening a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storefront {
    pub merchant: StoreInfo,
    pub products: Vec<StoreProduct>,
}

pub struct MarketplaceService {
    kv: Arc<dyn KvStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MarketplaceService {
    pub fn new(
        kv: Arc<dyn KvStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            kv,
            id_provider,
            time_provider,
        }
    }

    /// `{prefix}_{millis}`, bumped until the key is free
    async fn next_document_id(
        &self,
        prefix: &str,
        key_of: impl Fn(&str) -> String,
    ) -> Result<EntityId> {
        let mut millis = self.time_provider.now_millis();
        loop {
            let id = format!("{prefix}_{millis}");
            if self.kv.get(&key_of(&id)).await?.is_none() {
                return Ok(id);
            }
            millis += 1;
        }
    }

    // Products

    pub async fn list_products(&self, merchant_id: &str) -> Result<Vec<StoreProduct>> {
        keys::check(&[merchant_id])?;
        self.kv.list_json(&keys::products_of(merchant_id)).await
    }

    /// Create or replace a product, keeping its original `createdAt`
    pub async fn save_product(&self, merchant_id: &str, input: ProductInput) -> Result<StoreProduct> {
        keys::check(&[merchant_id])?;
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Le nom du produit est requis".to_string(),
            ));
        }
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(AppError::Validation("Le prix doit être positif".to_string()));
        }
        if input.stock < 0 {
            return Err(AppError::Validation(
                "Le stock doit être défini et positif".to_string(),
            ));
        }

        let id = match input.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                keys::check(&[&id])?;
                id
            }
            None => {
                self.next_document_id("product", |id| keys::product(merchant_id, id))
                    .await?
            }
        };
        let key = keys::product(merchant_id, &id);
        let now = self.time_provider.now();
        let existing: Option<StoreProduct> = self.kv.get_json(&key).await?;

        let product = StoreProduct {
            id,
            merchant_id: merchant_id.to_string(),
            name: name.to_string(),
            description: input.description,
            price: input.price,
            category: input.category,
            stock: input.stock,
            image_url: input.image_url,
            created_at: existing
                .map(|p| p.created_at)
                .or(input.created_at)
                .unwrap_or(now),
            updated_at: now,
        };
        self.kv.set_json(&key, &product).await?;

        debug!(merchant_id, product_id = %product.id, "Store product saved");
        Ok(product)
    }

    /// Idempotent: deleting a missing product succeeds
    pub async fn delete_product(&self, merchant_id: &str, product_id: &str) -> Result<()> {
        keys::check(&[merchant_id, product_id])?;
        self.kv
            .del(&keys::product(merchant_id, product_id))
            .await?;
        Ok(())
    }

    // Delivery people

    pub async fn list_delivery_people(&self, merchant_id: &str) -> Result<Vec<DeliveryPerson>> {
        keys::check(&[merchant_id])?;
        self.kv
            .list_json(&keys::delivery_people_of(merchant_id))
            .await
    }

    pub async fn add_delivery_person(
        &self,
        merchant_id: &str,
        req: NewDeliveryPerson,
    ) -> Result<DeliveryPerson> {
        keys::check(&[merchant_id])?;
        if req.name.trim().is_empty() {
            return Err(AppError::Validation("Le nom du livreur est requis".to_string()));
        }
        let id = self
            .next_document_id("delivery", |id| keys::delivery_person(merchant_id, id))
            .await?;

        let person = DeliveryPerson {
            id,
            merchant_id: merchant_id.to_string(),
            name: req.name.trim().to_string(),
            phone: req.phone,
            email: req.email,
            status: PresenceStatus::Offline,
            created_at: self.time_provider.now(),
        };
        self.kv
            .set_json(&keys::delivery_person(merchant_id, &person.id), &person)
            .await?;

        info!(merchant_id, delivery_person_id = %person.id, "Delivery person added");
        Ok(person)
    }

    // Storefront

    pub async fn storefront(&self, merchant_id: &str) -> Result<Storefront> {
        keys::check(&[merchant_id])?;
        let merchant = self
            .kv
            .get_json(&keys::merchant(merchant_id))
            .await?
            .unwrap_or_else(|| StoreInfo::placeholder(merchant_id));
        Ok(Storefront {
            merchant,
            products: self.list_products(merchant_id).await?,
        })
    }

    pub async fn update_store(&self, merchant_id: &str, settings: StoreSettings) -> Result<StoreInfo> {
        keys::check(&[merchant_id])?;
        let name = settings.name.trim();
        let info = StoreInfo {
            id: merchant_id.to_string(),
            name: if name.is_empty() {
                StoreInfo::placeholder(merchant_id).name
            } else {
                name.to_string()
            },
            description: settings.description,
            logo: settings.logo,
            header_image: settings.header_image,
        };
        self.kv
            .set_json(&keys::merchant(merchant_id), &info)
            .await?;
        Ok(info)
    }

    /// Place a pending order and take the ordered quantities out of stock
    pub async fn place_order(&self, merchant_id: &str, req: PlaceOrderRequest) -> Result<Order> {
        keys::check(&[merchant_id])?;
        if req.customer_name.trim().is_empty()
            || req.customer_phone.trim().is_empty()
            || req.customer_address.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Nom, téléphone et adresse du client sont requis".to_string(),
            ));
        }
        if req.items.is_empty() {
            return Err(AppError::Validation("La commande est vide".to_string()));
        }
        if req.items.iter().any(|item| item.quantity <= 0) {
            return Err(AppError::Validation(
                "Les quantités doivent être positives".to_string(),
            ));
        }
        if req
            .items
            .iter()
            .any(|item| !item.price.is_finite() || item.price < 0.0)
        {
            return Err(AppError::Validation("Le prix doit être positif".to_string()));
        }
        if req.total.is_some_and(|total| !total.is_finite() || total < 0.0) {
            return Err(AppError::Validation(
                "Le total doit être positif".to_string(),
            ));
        }
        for item in &req.items {
            keys::check(&[&item.product_id])?;
        }

        let id = self
            .next_document_id("order", |id| keys::order(merchant_id, id))
            .await?;
        let total = req.total.unwrap_or_else(|| {
            req.items
                .iter()
                .map(|item| item.price * item.quantity as f64)
                .sum()
        });

        let mut order = Order::new(
            id,
            self.time_provider.now(),
            merchant_id,
            req.customer_name.trim(),
            req.customer_phone.trim(),
            req.customer_address.trim(),
            req.items,
            total,
        );
        order.delivery_pin = Some(self.id_provider.generate_pin());
        self.kv
            .set_json(&keys::order(merchant_id, &order.id), &order)
            .await?;

        for item in &order.items {
            let key = keys::product(merchant_id, &item.product_id);
            // Unknown products are skipped
            if let Some(mut product) = self.kv.get_json::<StoreProduct>(&key).await? {
                product.take_stock(item.quantity);
                self.kv.set_json(&key, &product).await?;
            }
        }

        info!(merchant_id, order_id = %order.id, total = order.total, "Order placed");
        Ok(order)
    }

    /// Look an order up by ID across all merchants
    pub async fn find_order(&self, order_id: &str) -> Result<Order> {
        self.all_orders()
            .await?
            .into_iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| AppError::NotFound("Commande non trouvée".to_string()))
    }

    /// Every merchant order in the store
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        self.kv.list_json(keys::ALL_ORDERS).await
    }

    pub async fn merchant_stats(&self, merchant_id: &str) -> Result<MerchantDashboardStats> {
        keys::check(&[merchant_id])?;
        let products = self.list_products(merchant_id).await?;
        let orders = self.list_orders(merchant_id).await?;
        Ok(MerchantDashboardStats::compute(
            &products,
            &orders,
            self.time_provider.now().date_naive(),
        ))
    }
}
