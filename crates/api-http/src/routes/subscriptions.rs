use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::MerchantUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(history))
        .route("/subscriptions/:user_id/pay", post(pay))
}

async fn pay(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let subscription = state.subscriptions.pay(&user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Abonnement payé avec succès.",
            "subscription": subscription,
        })),
    ))
}

/// Payment history of the signed-in merchant, newest first
async fn history(
    State(state): State<AppState>,
    MerchantUser(ctx): MerchantUser,
) -> ApiResult<Json<Value>> {
    let subscriptions = state.subscriptions.history(&ctx.merchant_id).await?;
    Ok(Json(json!({ "subscriptions": subscriptions })))
}
