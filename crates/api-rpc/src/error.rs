//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use paps_core::domain::DomainError;
use paps_core::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const UNAUTHORIZED: i32 = 4010;
    pub const FORBIDDEN: i32 = 4030;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

fn owned(code: i32, msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code, msg.into(), None::<()>)
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => owned(code::VALIDATION_ERROR, msg),
        AppError::Serialization(e) => owned(code::VALIDATION_ERROR, e.to_string()),
        AppError::Domain(e @ DomainError::InvalidStatusTransition { .. }) => {
            owned(code::CONFLICT, e.to_string())
        }
        AppError::Domain(DomainError::Internal(msg)) => owned(code::INTERNAL_ERROR, msg),
        AppError::Domain(e) => owned(code::VALIDATION_ERROR, e.to_string()),
        AppError::NotFound(msg) => owned(code::NOT_FOUND, msg),
        AppError::Conflict(msg) | AppError::InvalidState(msg) => owned(code::CONFLICT, msg),
        AppError::Unauthorized(msg) => owned(code::UNAUTHORIZED, msg),
        AppError::Forbidden(msg) => owned(code::FORBIDDEN, msg),
        AppError::Database(msg) => owned(code::DB_ERROR, msg),
        AppError::Config(msg) | AppError::Internal(msg) => owned(code::INTERNAL_ERROR, msg),
    }
}

pub fn throttled() -> ErrorObjectOwned {
    owned(code::THROTTLED, "Rate limit exceeded. Please slow down.")
}
