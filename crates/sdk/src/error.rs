//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    /// The server answered with an error status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Offline queue error: {0}")]
    Queue(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl SdkError {
    /// The request never got an answer, so it is worth retrying later
    pub fn is_transport(&self) -> bool {
        matches!(self, SdkError::Transport(_) | SdkError::Connection(_))
    }

    /// The server refused the request (4xx); retrying it unchanged will not help
    ///
    /// 408 and 429 are excluded: the server may accept the same request later.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SdkError::Api { status, .. }
                if (400..500).contains(status) && *status != 408 && *status != 429
        )
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            SdkError::Transport(e.to_string())
        } else if e.is_decode() {
            SdkError::Other(format!("Decode error: {}", e))
        } else {
            SdkError::Other(e.to_string())
        }
    }
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
            },
            jsonrpsee::core::ClientError::Transport(e) => {
                SdkError::Transport(format!("Transport error: {}", e))
            }
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => {
                SdkError::Other(format!("Parse error: {}", e))
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}
