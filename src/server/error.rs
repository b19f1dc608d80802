//! Error-to-HTTP response conversion.
//!
//! Wraps [`crate::Error`] so route handlers can return
//! `Result<Response, ApiError>` and get the JSON error envelope the site
//! expects.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::Error;

/// Route handler error.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.0 {
            Error::NotFound { kind, .. } => (
                status,
                Json(json!({ "error": format!("{} not found", kind.label()) })),
            )
                .into_response(),
            Error::RangeNotSatisfiable { size } => (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{size}"))],
            )
                .into_response(),
            other => {
                tracing::error!(status = %status, error = %other, "Server error in media handler");
                (status, Json(json!({ "error": other.to_string() }))).into_response()
            }
        }
    }
}
