// Merchant catalog: products and categories

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use paps_core::application::catalog::NewProduct;
use paps_core::domain::ProductPatch;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, MerchantUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct StockUpdate {
    stock: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CategoryName {
    #[serde(alias = "nom", default)]
    name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/getProductByCommercant", get(list_products))
        .route("/getOneProduct/:id", get(get_product))
        .route("/createProduct", post(create_product))
        .route("/UpdateProduct/:id", put(update_product))
        .route("/updateStockProduct/:id/stock", patch(update_stock))
        .route("/deleteProduct/:id", delete(delete_product))
        .route("/getcategoriesByCommercant", get(list_categories))
        .route("/createCategories", post(create_category))
        .route("/getOnecategories/:id", get(get_category))
        .route("/getOneProductByCategories/:id/products", get(category_products))
        .route("/updateCategories/:id", put(rename_category))
        .route("/deleteCategories/:id", delete(delete_category))
}

async fn list_products(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
) -> ApiResult<Json<Value>> {
    let products = state.catalog.list_products(&ctx.merchant_id).await?;
    Ok(Json(json!({
        "message": "Vos produits récupérés avec succès",
        "total": products.len(),
        "products": products,
    })))
}

async fn get_product(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state.catalog.get_product(&ctx.merchant_id, &id).await?;
    Ok(Json(json!({
        "message": "Produit récupéré avec succès",
        "product": product,
    })))
}

async fn create_product(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    ApiJson(req): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let product = state.catalog.create_product(&ctx.merchant_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Votre produit a été créé avec succès",
            "product": product,
        })),
    ))
}

async fn update_product(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<Json<Value>> {
    let product = state
        .catalog
        .update_product(&ctx.merchant_id, &id, patch)
        .await?;
    Ok(Json(json!({
        "message": "Votre produit a été mis à jour avec succès",
        "product": product,
    })))
}

async fn update_stock(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StockUpdate>,
) -> ApiResult<Json<Value>> {
    let product = state
        .catalog
        .update_stock(&ctx.merchant_id, &id, body.stock)
        .await?;
    Ok(Json(json!({
        "message": "Stock mis à jour avec succès",
        "product": product,
    })))
}

async fn delete_product(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state.catalog.delete_product(&ctx.merchant_id, &id).await?;
    Ok(Json(json!({
        "message": "Votre produit a été supprimé avec succès",
        "product": product,
    })))
}

async fn list_categories(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
) -> ApiResult<Json<Value>> {
    let categories = state.catalog.list_categories(&ctx.merchant_id).await?;
    Ok(Json(json!({
        "message": "Vos catégories récupérées avec succès",
        "total": categories.len(),
        "categories": categories,
    })))
}

async fn create_category(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    ApiJson(body): ApiJson<CategoryName>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let category = state
        .catalog
        .create_category(&ctx.merchant_id, &body.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Votre catégorie a été créée avec succès",
            "category": category,
        })),
    ))
}

async fn get_category(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let category = state.catalog.get_category(&ctx.merchant_id, &id).await?;
    Ok(Json(json!({
        "message": "Catégorie récupérée avec succès",
        "category": category,
    })))
}

async fn category_products(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let (category, products) = state
        .catalog
        .list_category_products(&ctx.merchant_id, &id)
        .await?;
    Ok(Json(json!({
        "message": "Produits de la catégorie récupérés avec succès",
        "category": category,
        "total": products.len(),
        "products": products,
    })))
}

async fn rename_category(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CategoryName>,
) -> ApiResult<Json<Value>> {
    let category = state
        .catalog
        .rename_category(&ctx.merchant_id, &id, &body.name)
        .await?;
    Ok(Json(json!({
        "message": "Votre catégorie a été mise à jour avec succès",
        "category": category,
    })))
}

async fn delete_category(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let category = state.catalog.delete_category(&ctx.merchant_id, &id).await?;
    Ok(Json(json!({
        "message": "Votre catégorie a été supprimée avec succès",
        "category": category,
    })))
}
