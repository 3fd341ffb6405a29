//! HTTP Error Mapping
//!
//! Every failure leaves the API as
//! `{"success": false, "error": {"message", "status", "timestamp"}}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paps_core::domain::DomainError;
use paps_core::AppError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

const SERVER_ERROR: &str = "Erreur interne du serveur";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Corps de requête invalide: {0}")]
    BadRequest(String),

    #[error("Trop de requêtes. Veuillez ralentir.")]
    Throttled,

    #[error("Route non trouvée: {0}")]
    RouteNotFound(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    status: u16,
    timestamp: String,
}

pub fn status_of(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) | AppError::Serialization(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) | AppError::InvalidState(_) => StatusCode::CONFLICT,
        AppError::Domain(DomainError::InvalidStatusTransition { .. }) => StatusCode::CONFLICT,
        AppError::Domain(DomainError::Validation(_) | DomainError::UnknownStatus(_)) => {
            StatusCode::BAD_REQUEST
        }
        AppError::Domain(DomainError::Internal(_))
        | AppError::Database(_)
        | AppError::Config(_)
        | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::App(e) => status_of(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Throttled => StatusCode::TOO_MANY_REQUESTS,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::App(e) if self.status().is_server_error() => {
                error!(error = %e, "Request failed");
                SERVER_ERROR.to_string()
            }
            ApiError::App(e) => e.public_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                message: self.message(),
                status: status.as_u16(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(&AppError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(&AppError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&AppError::Domain(DomainError::InvalidStatusTransition {
                from: "assigned".into(),
                to: "delivered".into(),
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&AppError::Domain(DomainError::Validation("x".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = ApiError::from(AppError::Database("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["message"], SERVER_ERROR);
        assert_eq!(json["error"]["status"], 500);
        assert!(json["error"]["timestamp"].is_string());
    }
}
