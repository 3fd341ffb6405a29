// Catalog Repository Port (Interface)

use crate::domain::{Category, Product};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for a merchant's products and categories
///
/// Every lookup is scoped by `merchant_id`: a record owned by another
/// merchant behaves exactly like a missing one.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a new product
    async fn insert_product(&self, product: &Product) -> Result<()>;

    /// Find product (category name populated)
    async fn find_product(&self, merchant_id: &str, id: &str) -> Result<Option<Product>>;

    /// Update all mutable product fields
    async fn update_product(&self, product: &Product) -> Result<()>;

    /// Delete product; returns the deleted record
    async fn delete_product(&self, merchant_id: &str, id: &str) -> Result<Option<Product>>;

    /// All products of a merchant (category names populated)
    async fn list_products(&self, merchant_id: &str) -> Result<Vec<Product>>;

    /// Products filed under one category
    async fn list_products_in_category(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> Result<Vec<Product>>;

    /// Number of products filed under one category
    async fn count_products_in_category(&self, merchant_id: &str, category_id: &str)
        -> Result<i64>;

    /// Insert a new category
    async fn insert_category(&self, category: &Category) -> Result<()>;

    /// Find category
    async fn find_category(&self, merchant_id: &str, id: &str) -> Result<Option<Category>>;

    /// Find category by exact (trimmed) name, optionally ignoring one ID
    async fn find_category_by_name(
        &self,
        merchant_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<Category>>;

    /// Rename category
    async fn update_category(&self, category: &Category) -> Result<()>;

    /// Delete category; returns the deleted record
    async fn delete_category(&self, merchant_id: &str, id: &str) -> Result<Option<Category>>;

    /// All categories of a merchant
    async fn list_categories(&self, merchant_id: &str) -> Result<Vec<Category>>;
}
