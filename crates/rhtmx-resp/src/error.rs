// crates/rhtmx-resp/src/error.rs — emission errors and their 500 envelope response

//! Error types for response emission.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::envelope::ErrorEnvelope;

/// Result type alias for emitter operations.
pub type Result<T> = std::result::Result<T, RespError>;

/// Errors an emitter can return.
///
/// Encode failures are raised before anything reaches the sink, so the caller
/// may still send a different response. I/O failures happen after the head has
/// been committed and end the response.
#[derive(Debug, Error)]
pub enum RespError {
    #[error("failed to encode JSON response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("custom JSON encoder failed: {0}")]
    CustomEncode(anyhow::Error),

    #[error("failed to write response: {0}")]
    Io(#[from] std::io::Error),
}

impl RespError {
    /// `true` when the failure happened while encoding, before any commit.
    pub fn is_encode(&self) -> bool {
        matches!(self, RespError::Encode(_) | RespError::CustomEncode(_))
    }
}

impl IntoResponse for RespError {
    fn into_response(self) -> Response {
        tracing::error!("response emission failed: {}", self);
        ErrorEnvelope::internal(None).into_response()
    }
}
