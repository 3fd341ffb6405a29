// SQLite CatalogRepository Implementation

use crate::error::{from_millis, map_sqlx_error};
use async_trait::async_trait;
use paps_core::domain::{Category, Product};
use paps_core::error::{AppError, Result};
use paps_core::port::CatalogRepository;
use sqlx::SqlitePool;

pub struct SqliteCatalogRepository {
    pool: SqlitePool,
}

impl SqliteCatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Products joined with their category name
const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.price, p.image, p.stock, p.category_id,
           c.name AS category_name, p.merchant_id, p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price, image, stock, category_id, merchant_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .bind(product.stock)
        .bind(&product.category_id)
        .bind(&product.merchant_id)
        .bind(product.created_at.timestamp_millis())
        .bind(product.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_product(&self, merchant_id: &str, id: &str) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.id = ? AND p.merchant_id = ?"
        ))
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, image = ?, stock = ?, category_id = ?, updated_at = ?
            WHERE id = ? AND merchant_id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .bind(product.stock)
        .bind(&product.category_id)
        .bind(product.updated_at.timestamp_millis())
        .bind(&product.id)
        .bind(&product.merchant_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", product.id)));
        }
        Ok(())
    }

    async fn delete_product(&self, merchant_id: &str, id: &str) -> Result<Option<Product>> {
        let Some(product) = self.find_product(merchant_id, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM products WHERE id = ? AND merchant_id = ?")
            .bind(id)
            .bind(merchant_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Some(product))
    }

    async fn list_products(&self, merchant_id: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.merchant_id = ? ORDER BY p.created_at DESC"
        ))
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn list_products_in_category(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.merchant_id = ? AND p.category_id = ? ORDER BY p.created_at DESC"
        ))
        .bind(merchant_id)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn count_products_in_category(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE merchant_id = ? AND category_id = ?",
        )
        .bind(merchant_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            "INSERT INTO categories (id, name, merchant_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.merchant_id)
        .bind(category.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_category(&self, merchant_id: &str, id: &str) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, merchant_id, created_at FROM categories WHERE id = ? AND merchant_id = ?",
        )
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn find_category_by_name(
        &self,
        merchant_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, merchant_id, created_at FROM categories
            WHERE merchant_id = ? AND name = ? AND (? IS NULL OR id != ?)
            LIMIT 1
            "#,
        )
        .bind(merchant_id)
        .bind(name)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ? AND merchant_id = ?")
            .bind(&category.name)
            .bind(&category.id)
            .bind(&category.merchant_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category.id
            )));
        }
        Ok(())
    }

    async fn delete_category(&self, merchant_id: &str, id: &str) -> Result<Option<Category>> {
        let Some(category) = self.find_category(merchant_id, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM categories WHERE id = ? AND merchant_id = ?")
            .bind(id)
            .bind(merchant_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Some(category))
    }

    async fn list_categories(&self, merchant_id: &str) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, merchant_id, created_at FROM categories WHERE merchant_id = ? ORDER BY name",
        )
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    image: Option<String>,
    stock: i64,
    category_id: Option<String>,
    category_name: Option<String>,
    merchant_id: String,
    created_at: i64,
    updated_at: i64,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            stock: self.stock,
            category_id: self.category_id,
            category_name: self.category_name,
            merchant_id: self.merchant_id,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    merchant_id: String,
    created_at: i64,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            merchant_id: self.merchant_id,
            created_at: from_millis(self.created_at),
        }
    }
}
