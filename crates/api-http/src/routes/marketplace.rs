// Storefront, merchant order desk and courier endpoints backed by the key-value store.
//
// These routes carry no bearer token: callers identify the merchant or courier in the path.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use paps_core::application::marketplace::{
    NewDeliveryPerson, PlaceOrderRequest, ProductInput, StoreSettings, Storefront,
};
use paps_core::domain::{BackofficeStats, MerchantDashboardStats, OrderStatus, PresenceStatus};
use paps_core::AppError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignRequest {
    #[serde(default)]
    delivery_person_id: String,
}

#[derive(Debug, Deserialize)]
struct PresenceRequest {
    status: PresenceStatus,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ProofRequest {
    #[serde(default)]
    pin: String,
    #[serde(default)]
    photo: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // merchant
        .route(
            "/merchant/:merchant_id/products",
            get(list_products).post(save_product),
        )
        .route(
            "/merchant/:merchant_id/products/:product_id",
            delete(delete_product),
        )
        .route("/merchant/:merchant_id/orders", get(list_orders))
        .route(
            "/merchant/:merchant_id/orders/:order_id/assign",
            post(assign_order),
        )
        .route(
            "/merchant/:merchant_id/delivery-people",
            get(list_delivery_people).post(add_delivery_person),
        )
        .route("/merchant/:merchant_id/store", put(update_store))
        .route("/merchant/:merchant_id/stats", get(merchant_stats))
        // courier
        .route("/delivery/:courier_id/orders", get(courier_orders))
        .route("/delivery/:courier_id/status", post(set_presence))
        .route(
            "/delivery/:courier_id/orders/:order_id/accept",
            post(accept_order),
        )
        .route(
            "/delivery/:courier_id/orders/:order_id/status",
            post(update_order_status),
        )
        .route(
            "/delivery/:courier_id/orders/:order_id/proof",
            post(submit_proof),
        )
        // customer
        .route("/store/:merchant_id", get(storefront))
        .route("/store/:merchant_id/orders", post(place_order))
        .route("/orders/:order_id", get(find_order))
        // back office
        .route("/admin/stats", get(backoffice_stats))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_products(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let products = state.marketplace.list_products(&merchant_id).await?;
    Ok(Json(json!({ "products": products })))
}

async fn save_product(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<Json<Value>> {
    let product = state.marketplace.save_product(&merchant_id, input).await?;
    Ok(Json(json!({ "success": true, "product": product })))
}

async fn delete_product(
    State(state): State<AppState>,
    Path((merchant_id, product_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state
        .marketplace
        .delete_product(&merchant_id, &product_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn list_orders(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let orders = state.marketplace.list_orders(&merchant_id).await?;
    Ok(Json(json!({ "orders": orders })))
}

async fn assign_order(
    State(state): State<AppState>,
    Path((merchant_id, order_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<AssignRequest>,
) -> ApiResult<Json<Value>> {
    let order = state
        .marketplace
        .assign_order(&merchant_id, &order_id, &req.delivery_person_id)
        .await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

async fn list_delivery_people(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let people = state.marketplace.list_delivery_people(&merchant_id).await?;
    Ok(Json(json!({ "deliveryPeople": people })))
}

async fn add_delivery_person(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    ApiJson(req): ApiJson<NewDeliveryPerson>,
) -> ApiResult<Json<Value>> {
    let person = state
        .marketplace
        .add_delivery_person(&merchant_id, req)
        .await?;
    Ok(Json(json!({ "success": true, "deliveryPerson": person })))
}

async fn update_store(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    ApiJson(settings): ApiJson<StoreSettings>,
) -> ApiResult<Json<Value>> {
    let merchant = state
        .marketplace
        .update_store(&merchant_id, settings)
        .await?;
    Ok(Json(json!({ "success": true, "merchant": merchant })))
}

async fn merchant_stats(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> ApiResult<Json<MerchantDashboardStats>> {
    Ok(Json(state.marketplace.merchant_stats(&merchant_id).await?))
}

async fn courier_orders(
    State(state): State<AppState>,
    Path(courier_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let orders = state.marketplace.courier_orders(&courier_id).await?;
    Ok(Json(json!({ "orders": orders })))
}

async fn set_presence(
    State(state): State<AppState>,
    Path(courier_id): Path<String>,
    ApiJson(req): ApiJson<PresenceRequest>,
) -> ApiResult<Json<Value>> {
    state
        .marketplace
        .set_presence(&courier_id, req.status)
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn accept_order(
    State(state): State<AppState>,
    Path((courier_id, order_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let order = state
        .marketplace
        .accept_order(&courier_id, &order_id)
        .await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path((courier_id, order_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> ApiResult<Json<Value>> {
    let status: OrderStatus = req.status.parse().map_err(AppError::from)?;
    let order = state
        .marketplace
        .update_order_status(&courier_id, &order_id, status)
        .await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

async fn submit_proof(
    State(state): State<AppState>,
    Path((courier_id, order_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<ProofRequest>,
) -> ApiResult<Json<Value>> {
    let order = state
        .marketplace
        .submit_proof(&courier_id, &order_id, &req.pin, &req.photo)
        .await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

async fn storefront(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> ApiResult<Json<Storefront>> {
    Ok(Json(state.marketplace.storefront(&merchant_id).await?))
}

async fn place_order(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    ApiJson(req): ApiJson<PlaceOrderRequest>,
) -> ApiResult<Json<Value>> {
    let order = state.marketplace.place_order(&merchant_id, req).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

async fn find_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let order = state.marketplace.find_order(&order_id).await?;
    Ok(Json(json!({ "order": order })))
}

async fn backoffice_stats(State(state): State<AppState>) -> ApiResult<Json<BackofficeStats>> {
    Ok(Json(state.backoffice.stats().await?))
}
