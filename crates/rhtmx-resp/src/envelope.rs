// crates/rhtmx-resp/src/envelope.rs — JSON error body `{"code":..,"message":..}`
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::status::status_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub message: String,
}

impl ErrorEnvelope {
    /// Falls back to the standard reason text for `code` when `message` is
    /// `None`.
    pub fn new(code: u16, message: Option<&str>) -> Self {
        Self {
            code,
            message: message.unwrap_or_else(|| status_text(code)).to_string(),
        }
    }

    pub fn not_found(message: Option<&str>) -> Self {
        Self::new(StatusCode::NOT_FOUND.as_u16(), message)
    }

    pub fn internal(message: Option<&str>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), message)
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
