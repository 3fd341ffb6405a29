use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use paps_core::application::auth::{SignInRequest, SignInResponse, SignUpRequest};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/verify-token/:token", get(verify_token))
}

async fn sign_up(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state.auth.sign_up_merchant(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Commerçant et compte utilisateur créés avec succès.",
            "user": user,
        })),
    ))
}

async fn sign_in(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    Ok(Json(state.auth.sign_in(req).await?))
}

async fn verify_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = state.auth.verify_token(&token).await?;
    Ok(Json(json!({
        "message": "Utilisateur récupéré avec succès.",
        "user": user,
    })))
}
