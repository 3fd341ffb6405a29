// Courier (livreur) accounts

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use paps_core::application::courier::{CourierUpdate, NewCourier};
use paps_core::domain::{Courier, CourierProfile, UserProfile};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, MerchantUser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/createLivreur", post(create_courier))
        .route("/getOnelivreur/:id", get(get_courier))
        .route("/updatelivreur/:id", put(update_courier))
        .route("/deletelivreur/:id", delete(delete_courier))
        .route("/getAlllivreurs", get(list_couriers))
        .route("/getAlllivreursByCommercants", get(list_merchant_couriers))
}

async fn create_courier(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewCourier>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (courier, user) = state.couriers.create_courier(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Livreur et utilisateur créés avec succès",
            "courier": courier,
            "user": user,
        })),
    ))
}

async fn get_courier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourierProfile>> {
    Ok(Json(state.couriers.get_courier(&id).await?))
}

async fn update_courier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<CourierUpdate>,
) -> ApiResult<Json<Value>> {
    let user = state.couriers.update_courier(&id, update).await?;
    Ok(Json(json!({
        "message": "Livreur mis à jour avec succès.",
        "user": user.profile(),
    })))
}

async fn delete_courier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.couriers.delete_courier(&id).await?;
    Ok(Json(json!({ "message": "Livreur supprimé avec succès" })))
}

async fn list_couriers(State(state): State<AppState>) -> ApiResult<Json<Vec<Courier>>> {
    Ok(Json(state.couriers.list_couriers().await?))
}

async fn list_merchant_couriers(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(
        state
            .couriers
            .list_merchant_couriers(&ctx.merchant_id)
            .await?,
    ))
}
