// Catalog Domain Model (products and categories of a merchant)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::EntityId;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub stock: i64,
    pub category_id: Option<EntityId>,
    /// Populated on reads from the category table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub merchant_id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a validated product (name is trimmed)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        now: DateTime<Utc>,
        merchant_id: impl Into<String>,
        name: &str,
        price: f64,
        stock: i64,
        image: Option<String>,
        category_id: Option<String>,
    ) -> Result<Self> {
        let name = validate_product_name(name, "Le nom du produit est requis")?;
        validate_price(price, "Le prix du produit est requis et doit être positif")?;
        validate_stock(stock)?;

        Ok(Self {
            id: id.into(),
            name,
            price,
            image,
            stock,
            category_id,
            category_name: None,
            merchant_id: merchant_id.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the stock level
    pub fn set_stock(&mut self, stock: i64, now: DateTime<Utc>) -> Result<()> {
        validate_stock(stock)?;
        self.stock = stock;
        self.updated_at = now;
        Ok(())
    }
}

/// Partial product update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub stock: Option<i64>,
    pub category_id: Option<EntityId>,
}

impl ProductPatch {
    /// Validate every supplied field, then apply them all
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) -> Result<()> {
        let name = match &self.name {
            Some(n) => Some(validate_product_name(
                n,
                "Le nom du produit ne peut pas être vide",
            )?),
            None => None,
        };
        if let Some(price) = self.price {
            validate_price(price, "Le prix doit être positif")?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }

        if let Some(name) = name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = Some(image);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = Some(category_id);
            product.category_name = None;
        }
        product.updated_at = now;
        Ok(())
    }
}

/// Category entity (scoped to one merchant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub merchant_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        now: DateTime<Utc>,
        merchant_id: impl Into<String>,
        name: &str,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            name: normalize_category_name(name)?,
            merchant_id: merchant_id.into(),
            created_at: now,
        })
    }
}

/// Category with the number of products filed under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: i64,
}

/// Trim a category name, rejecting blank input
pub fn normalize_category_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "Le nom de la catégorie est requis".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_product_name(name: &str, message: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64, message: &str) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::Validation(message.to_string()));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<()> {
    if stock < 0 {
        return Err(DomainError::Validation(
            "Le stock doit être défini et positif".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new("p1", Utc::now(), "m1", "  Thiakry ", 1500.0, 10, None, None).unwrap()
    }

    #[test]
    fn test_new_product_trims_name() {
        assert_eq!(product().name, "Thiakry");
    }

    #[test]
    fn test_new_product_rejects_invalid_fields() {
        let now = Utc::now();
        assert!(Product::new("p", now, "m", "   ", 1.0, 1, None, None).is_err());
        assert!(Product::new("p", now, "m", "x", -1.0, 1, None, None).is_err());
        assert!(Product::new("p", now, "m", "x", f64::NAN, 1, None, None).is_err());
        assert!(Product::new("p", now, "m", "x", 1.0, -3, None, None).is_err());
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut p = product();
        let patch = ProductPatch {
            price: Some(2000.0),
            ..Default::default()
        };
        patch.apply(&mut p, Utc::now()).unwrap();
        assert_eq!(p.price, 2000.0);
        assert_eq!(p.name, "Thiakry");
        assert_eq!(p.stock, 10);
    }

    #[test]
    fn test_patch_is_all_or_nothing() {
        let mut p = product();
        let patch = ProductPatch {
            name: Some("Bissap".to_string()),
            stock: Some(-1),
            ..Default::default()
        };
        let err = patch.apply(&mut p, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("stock"));
        assert_eq!(p.name, "Thiakry");
    }

    #[test]
    fn test_category_name_normalized() {
        let c = Category::new("c1", Utc::now(), "m1", "  Boissons  ").unwrap();
        assert_eq!(c.name, "Boissons");
        assert!(Category::new("c2", Utc::now(), "m1", "  ").is_err());
    }
}
