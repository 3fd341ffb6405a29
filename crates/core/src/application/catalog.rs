// Catalog Service - a merchant's products and categories

use crate::domain::catalog::normalize_category_name;
use crate::domain::{Category, CategoryDetail, EntityId, Product, ProductPatch};
use crate::error::{AppError, Result};
use crate::port::{CatalogRepository, IdProvider, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const PRODUCT_NOT_FOUND: &str = "Produit non trouvé ou vous n'y avez pas accès";
const PRODUCT_NOT_WRITABLE: &str =
    "Produit non trouvé ou vous n'avez pas l'autorisation de le modifier";
const CATEGORY_NOT_FOUND: &str = "Catégorie non trouvée ou vous n'y avez pas accès";
const CATEGORY_NOT_WRITABLE: &str =
    "Catégorie non trouvée ou vous n'avez pas l'autorisation de la modifier";
const DUPLICATE_CATEGORY: &str = "Vous avez déjà une catégorie avec ce nom";

/// Product creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    #[serde(alias = "categorie_id", alias = "categoryId")]
    pub category_id: Option<EntityId>,
}

pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            catalog,
            id_provider,
            time_provider,
        }
    }

    pub async fn list_products(&self, merchant_id: &str) -> Result<Vec<Product>> {
        self.catalog.list_products(merchant_id).await
    }

    pub async fn get_product(&self, merchant_id: &str, id: &str) -> Result<Product> {
        self.catalog
            .find_product(merchant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
    }

    pub async fn create_product(&self, merchant_id: &str, req: NewProduct) -> Result<Product> {
        // Missing price/stock read as invalid, not as zero
        let product = Product::new(
            self.id_provider.generate_id(),
            self.time_provider.now(),
            merchant_id,
            &req.name,
            req.price.unwrap_or(-1.0),
            req.stock.unwrap_or(-1),
            req.image,
            req.category_id,
        )?;
        if let Some(category_id) = &product.category_id {
            self.ensure_category(merchant_id, category_id).await?;
        }

        self.catalog.insert_product(&product).await?;
        info!(merchant_id, product_id = %product.id, "Product created");
        self.get_product(merchant_id, &product.id).await
    }

    /// Apply only the supplied fields
    pub async fn update_product(
        &self,
        merchant_id: &str,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Product> {
        let mut product = self
            .catalog
            .find_product(merchant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_WRITABLE.to_string()))?;
        if let Some(category_id) = &patch.category_id {
            self.ensure_category(merchant_id, category_id).await?;
        }

        patch.apply(&mut product, self.time_provider.now())?;
        self.catalog.update_product(&product).await?;
        self.get_product(merchant_id, id).await
    }

    pub async fn update_stock(
        &self,
        merchant_id: &str,
        id: &str,
        stock: Option<i64>,
    ) -> Result<Product> {
        let stock = stock.ok_or_else(|| {
            AppError::Validation("Le stock doit être défini et positif".to_string())
        })?;
        let mut product = self
            .catalog
            .find_product(merchant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_WRITABLE.to_string()))?;

        product.set_stock(stock, self.time_provider.now())?;
        self.catalog.update_product(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, merchant_id: &str, id: &str) -> Result<Product> {
        let deleted = self.catalog.delete_product(merchant_id, id).await?.ok_or_else(|| {
            AppError::NotFound(
                "Produit non trouvé ou vous n'avez pas l'autorisation de le supprimer".to_string(),
            )
        })?;
        info!(merchant_id, product_id = %id, "Product deleted");
        Ok(deleted)
    }

    pub async fn list_categories(&self, merchant_id: &str) -> Result<Vec<Category>> {
        self.catalog.list_categories(merchant_id).await
    }

    pub async fn get_category(&self, merchant_id: &str, id: &str) -> Result<CategoryDetail> {
        let category = self
            .catalog
            .find_category(merchant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))?;
        let product_count = self
            .catalog
            .count_products_in_category(merchant_id, id)
            .await?;
        Ok(CategoryDetail {
            category,
            product_count,
        })
    }

    pub async fn create_category(&self, merchant_id: &str, name: &str) -> Result<Category> {
        let category = Category::new(
            self.id_provider.generate_id(),
            self.time_provider.now(),
            merchant_id,
            name,
        )?;
        if self
            .catalog
            .find_category_by_name(merchant_id, &category.name, None)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(DUPLICATE_CATEGORY.to_string()));
        }

        self.catalog.insert_category(&category).await?;
        info!(merchant_id, category_id = %category.id, "Category created");
        Ok(category)
    }

    pub async fn rename_category(&self, merchant_id: &str, id: &str, name: &str) -> Result<Category> {
        let name = normalize_category_name(name)?;
        if self
            .catalog
            .find_category_by_name(merchant_id, &name, Some(id))
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(DUPLICATE_CATEGORY.to_string()));
        }

        let mut category = self
            .catalog
            .find_category(merchant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_WRITABLE.to_string()))?;
        category.name = name;
        self.catalog.update_category(&category).await?;
        Ok(category)
    }

    /// Refused while products still reference the category
    pub async fn delete_category(&self, merchant_id: &str, id: &str) -> Result<Category> {
        let linked = self
            .catalog
            .count_products_in_category(merchant_id, id)
            .await?;
        if linked > 0 {
            return Err(AppError::Validation(format!(
                "Impossible de supprimer la catégorie car elle contient {} produit(s). \
                 Veuillez d'abord supprimer ou déplacer ces produits.",
                linked
            )));
        }

        self.catalog
            .delete_category(merchant_id, id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Catégorie non trouvée ou vous n'avez pas l'autorisation de la supprimer"
                        .to_string(),
                )
            })
    }

    pub async fn list_category_products(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> Result<(Category, Vec<Product>)> {
        let category = self
            .catalog
            .find_category(merchant_id, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))?;
        let products = self
            .catalog
            .list_products_in_category(merchant_id, category_id)
            .await?;
        Ok((category, products))
    }

    async fn ensure_category(&self, merchant_id: &str, category_id: &str) -> Result<()> {
        match self.catalog.find_category(merchant_id, category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation(CATEGORY_NOT_FOUND.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FixedClock, InMemoryCatalog, SequentialIds};
    use chrono::Utc;

    fn service() -> CatalogService {
        CatalogService::new(
            Arc::new(InMemoryCatalog::default()),
            Arc::new(SequentialIds::default()),
            Arc::new(FixedClock::at(Utc::now())),
        )
    }

    fn new_product(name: &str, category_id: Option<String>) -> NewProduct {
        NewProduct {
            name: name.into(),
            price: Some(1200.0),
            stock: Some(8),
            image: None,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_product_with_category_name() {
        let svc = service();
        let cat = svc.create_category("m1", "Boissons").await.unwrap();
        let product = svc
            .create_product("m1", new_product("Bissap", Some(cat.id.clone())))
            .await
            .unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Boissons"));
        assert_eq!(svc.list_products("m1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_validation() {
        let svc = service();
        let mut req = new_product("Bissap", None);
        req.price = None;
        let err = svc.create_product("m1", req).await.unwrap_err();
        assert!(err.public_message().contains("prix"));

        let err = svc
            .create_product("m1", new_product("Bissap", Some("nope".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_products_are_scoped_to_merchant() {
        let svc = service();
        let product = svc
            .create_product("m1", new_product("Bissap", None))
            .await
            .unwrap();

        assert!(matches!(
            svc.get_product("m2", &product.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(svc.delete_product("m2", &product.id).await.is_err());
        assert!(svc.list_products("m2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_stock() {
        let svc = service();
        let product = svc
            .create_product("m1", new_product("Bissap", None))
            .await
            .unwrap();

        assert!(svc.update_stock("m1", &product.id, None).await.is_err());
        assert!(svc.update_stock("m1", &product.id, Some(-2)).await.is_err());
        let updated = svc.update_stock("m1", &product.id, Some(0)).await.unwrap();
        assert_eq!(updated.stock, 0);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let svc = service();
        let product = svc
            .create_product("m1", new_product("Bissap", None))
            .await
            .unwrap();
        let patch = ProductPatch {
            name: Some("  Bissap rouge ".into()),
            ..Default::default()
        };
        let updated = svc.update_product("m1", &product.id, patch).await.unwrap();
        assert_eq!(updated.name, "Bissap rouge");
        assert_eq!(updated.price, 1200.0);
    }

    #[tokio::test]
    async fn test_category_name_unique_per_merchant() {
        let svc = service();
        svc.create_category("m1", "Boissons").await.unwrap();
        let err = svc.create_category("m1", " Boissons ").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // Another merchant may reuse the name
        svc.create_category("m2", "Boissons").await.unwrap();

        let other = svc.create_category("m1", "Fruits").await.unwrap();
        let err = svc
            .rename_category("m1", &other.id, "Boissons")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // Renaming to its own name is fine
        svc.rename_category("m1", &other.id, "Fruits").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_category_with_products_refused() {
        let svc = service();
        let cat = svc.create_category("m1", "Boissons").await.unwrap();
        let product = svc
            .create_product("m1", new_product("Bissap", Some(cat.id.clone())))
            .await
            .unwrap();

        let detail = svc.get_category("m1", &cat.id).await.unwrap();
        assert_eq!(detail.product_count, 1);

        let err = svc.delete_category("m1", &cat.id).await.unwrap_err();
        assert!(err.public_message().contains("1 produit(s)"));

        svc.delete_product("m1", &product.id).await.unwrap();
        svc.delete_category("m1", &cat.id).await.unwrap();
        assert!(svc.list_categories("m1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_category_products() {
        let svc = service();
        let cat = svc.create_category("m1", "Boissons").await.unwrap();
        svc.create_product("m1", new_product("Bissap", Some(cat.id.clone())))
            .await
            .unwrap();
        svc.create_product("m1", new_product("Pain", None))
            .await
            .unwrap();

        let (category, products) = svc.list_category_products("m1", &cat.id).await.unwrap();
        assert_eq!(category.name, "Boissons");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Bissap");
    }
}
