//! HTTP handlers.

pub mod events;
pub mod health;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use funnel_core::ValidationError;

/// 400 envelope for validation failures.
pub(crate) fn bad_request(err: ValidationError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Bad Request",
            "message": err.to_string(),
        })),
    )
}
