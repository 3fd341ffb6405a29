// In-memory port implementations for application tests

use crate::domain::{
    AccountStatus, Category, Courier, EntityId, Merchant, Product, Role, Subscription,
    SubscriptionStatus, User,
};
use crate::error::{AppError, Result};
use crate::port::{
    AccountRepository, AccountTransaction, CatalogRepository, IdProvider, KvStore, PasswordHasher,
    SubscriptionRepository, TimeProvider, TokenClaims, TokenService, Transaction,
    TransactionalAccountRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Deterministic IDs: `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdProvider for SequentialIds {
    fn generate_id(&self) -> String {
        format!("id-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn generate_pin(&self) -> String {
        "4821".to_string()
    }
}

/// Settable clock
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Stores `plain:<password>` so tests can read it back
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Token is the JSON encoding of the claims
pub struct JsonTokens;

impl TokenService for JsonTokens {
    fn issue(&self, claims: &TokenClaims) -> Result<String> {
        Ok(serde_json::to_string(claims)?)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims> {
        serde_json::from_str(token).map_err(|_| AppError::Unauthorized("bad token".into()))
    }
}

#[derive(Default)]
struct AccountTables {
    users: BTreeMap<EntityId, User>,
    merchants: BTreeMap<EntityId, Merchant>,
    couriers: BTreeMap<EntityId, Courier>,
}

#[derive(Default, Clone)]
pub struct InMemoryAccounts {
    tables: Arc<Mutex<AccountTables>>,
}

impl InMemoryAccounts {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn merchant_count(&self) -> usize {
        self.tables.lock().unwrap().merchants.len()
    }

    pub fn put_user(&self, user: User) {
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(user.id.clone(), user);
    }

    pub fn put_merchant(&self, merchant: Merchant) {
        self.tables
            .lock()
            .unwrap()
            .merchants
            .insert(merchant.id.clone(), merchant);
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables.lock().unwrap().users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_courier(&self, courier_id: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .values()
            .find(|u| u.courier_id.as_deref() == Some(courier_id))
            .cloned())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.put_user(user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        Ok(self.tables.lock().unwrap().users.remove(id).is_some())
    }

    async fn list_courier_users(&self, merchant_id: &str) -> Result<Vec<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .values()
            .filter(|u| u.role == Role::Livreur && u.merchant_id.as_deref() == Some(merchant_id))
            .cloned()
            .collect())
    }

    async fn find_courier(&self, id: &str) -> Result<Option<Courier>> {
        Ok(self.tables.lock().unwrap().couriers.get(id).cloned())
    }

    async fn list_couriers(&self) -> Result<Vec<Courier>> {
        Ok(self.tables.lock().unwrap().couriers.values().cloned().collect())
    }

    async fn set_courier_merchant(&self, courier_id: &str, merchant_id: &str) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        match tables.couriers.get_mut(courier_id) {
            Some(c) => {
                c.merchant_id = Some(merchant_id.to_string());
                Ok(())
            }
            None => Err(AppError::NotFound(courier_id.to_string())),
        }
    }

    async fn find_merchant(&self, id: &str) -> Result<Option<Merchant>> {
        Ok(self.tables.lock().unwrap().merchants.get(id).cloned())
    }

    async fn list_merchants(&self) -> Result<Vec<Merchant>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .merchants
            .values()
            .cloned()
            .collect())
    }

    async fn set_merchant_status(&self, id: &EntityId, status: AccountStatus) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        match tables.merchants.get_mut(id) {
            Some(m) => {
                m.status = status;
                Ok(())
            }
            None => Err(AppError::NotFound(id.clone())),
        }
    }
}

/// Buffers writes until commit
pub struct InMemoryAccountTx {
    tables: Arc<Mutex<AccountTables>>,
    pending: AccountTables,
}

#[async_trait]
impl Transaction for InMemoryAccountTx {
    async fn commit(self: Box<Self>) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.users.extend(self.pending.users);
        tables.merchants.extend(self.pending.merchants);
        tables.couriers.extend(self.pending.couriers);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl AccountTransaction for InMemoryAccountTx {
    async fn email_exists(&mut self, email: &str) -> Result<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .values()
            .chain(self.pending.users.values())
            .any(|u| u.email == email))
    }

    async fn insert_merchant(&mut self, merchant: &Merchant) -> Result<()> {
        self.pending
            .merchants
            .insert(merchant.id.clone(), merchant.clone());
        Ok(())
    }

    async fn insert_courier(&mut self, courier: &Courier) -> Result<()> {
        self.pending
            .couriers
            .insert(courier.id.clone(), courier.clone());
        Ok(())
    }

    async fn insert_user(&mut self, user: &User) -> Result<()> {
        self.pending.users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl TransactionalAccountRepository for InMemoryAccounts {
    async fn begin_transaction(&self) -> Result<Box<dyn AccountTransaction>> {
        Ok(Box::new(InMemoryAccountTx {
            tables: self.tables.clone(),
            pending: AccountTables::default(),
        }))
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    products: Mutex<BTreeMap<EntityId, Product>>,
    categories: Mutex<BTreeMap<EntityId, Category>>,
}

impl InMemoryCatalog {
    fn with_category_name(&self, mut product: Product) -> Product {
        product.category_name = product.category_id.as_ref().and_then(|id| {
            self.categories
                .lock()
                .unwrap()
                .get(id)
                .map(|c| c.name.clone())
        });
        product
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn find_product(&self, merchant_id: &str, id: &str) -> Result<Option<Product>> {
        let found = self
            .products
            .lock()
            .unwrap()
            .get(id)
            .filter(|p| p.merchant_id == merchant_id)
            .cloned();
        Ok(found.map(|p| self.with_category_name(p)))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.insert_product(product).await
    }

    async fn delete_product(&self, merchant_id: &str, id: &str) -> Result<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        if products.get(id).map(|p| p.merchant_id.as_str()) != Some(merchant_id) {
            return Ok(None);
        }
        Ok(products.remove(id))
    }

    async fn list_products(&self, merchant_id: &str) -> Result<Vec<Product>> {
        let products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.merchant_id == merchant_id)
            .cloned()
            .collect();
        Ok(products
            .into_iter()
            .map(|p| self.with_category_name(p))
            .collect())
    }

    async fn list_products_in_category(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> Result<Vec<Product>> {
        let all = self.list_products(merchant_id).await?;
        Ok(all
            .into_iter()
            .filter(|p| p.category_id.as_deref() == Some(category_id))
            .collect())
    }

    async fn count_products_in_category(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> Result<i64> {
        Ok(self
            .list_products_in_category(merchant_id, category_id)
            .await?
            .len() as i64)
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id.clone(), category.clone());
        Ok(())
    }

    async fn find_category(&self, merchant_id: &str, id: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(id)
            .filter(|c| c.merchant_id == merchant_id)
            .cloned())
    }

    async fn find_category_by_name(
        &self,
        merchant_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .find(|c| {
                c.merchant_id == merchant_id
                    && c.name == name
                    && Some(c.id.as_str()) != exclude_id
            })
            .cloned())
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        self.insert_category(category).await
    }

    async fn delete_category(&self, merchant_id: &str, id: &str) -> Result<Option<Category>> {
        let mut categories = self.categories.lock().unwrap();
        if categories.get(id).map(|c| c.merchant_id.as_str()) != Some(merchant_id) {
            return Ok(None);
        }
        Ok(categories.remove(id))
    }

    async fn list_categories(&self, merchant_id: &str) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.merchant_id == merchant_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySubscriptions {
    rows: Mutex<Vec<Subscription>>,
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptions {
    async fn insert(&self, subscription: &Subscription) -> Result<()> {
        self.rows.lock().unwrap().push(subscription.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_by_merchant(&self, merchant_id: &str) -> Result<Vec<Subscription>> {
        let mut rows: Vec<Subscription> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.merchant_id == merchant_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(rows)
    }

    async fn expire_ended(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut count = 0;
        for sub in self.rows.lock().unwrap().iter_mut() {
            if sub.status == SubscriptionStatus::Active && sub.end < now {
                sub.status = SubscriptionStatus::Inactive;
                count += 1;
            }
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct InMemoryKv {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl InMemoryKv {
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }
}
