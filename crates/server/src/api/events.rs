//! Event ingestion handlers: single, batch, and the schema document.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use futures::future;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use funnel_core::{Event, RawEvent, ValidationError, MAX_BATCH_SIZE};

use super::bad_request;
use crate::auth::ApiKey;
use crate::state::AppState;

/// POST /api/v1/events
pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Extension(ApiKey(api_key)): Extension<ApiKey>,
    Json(raw): Json<RawEvent>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let event = raw.enrich(&api_key, Utc::now()).map_err(bad_request)?;

    match state.sink.dispatch(&event).await {
        Ok(()) => {
            info!(
                event_id = %event.event_id,
                event_name = %event.event_name,
                account_id = %event.account_id_or_unknown(),
                "Event queued"
            );
            Ok((
                StatusCode::ACCEPTED,
                Json(json!({
                    "status": "accepted",
                    "event_id": event.event_id,
                    "message": "Event queued for processing",
                })),
            ))
        }
        Err(e) => {
            error!(
                event_id = %event.event_id,
                event_name = %event.event_name,
                account_id = %event.account_id_or_unknown(),
                error = %e,
                "Failed to queue event"
            );
            Err(queue_failure("Failed to queue event"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Untyped until shape validation so a missing or non-array value gets
    /// the gateway's own message rather than a deserializer error.
    #[serde(default)]
    pub events: Option<Value>,
}

/// POST /api/v1/events/batch
///
/// Validation is all-or-nothing before any enrichment or dispatch work.
/// Member dispatches then run concurrently, and the batch either succeeds
/// as a whole or reports a single failure; there is no partial-success
/// response.
pub async fn ingest_batch(
    State(state): State<Arc<AppState>>,
    Extension(ApiKey(api_key)): Extension<ApiKey>,
    Json(body): Json<BatchRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let members = match body.events {
        Some(Value::Array(members)) if !members.is_empty() => members,
        _ => return Err(bad_request(ValidationError::InvalidBatchShape)),
    };

    if members.len() > MAX_BATCH_SIZE {
        return Err(bad_request(ValidationError::BatchTooLarge));
    }

    let mut raws: Vec<RawEvent> = Vec::with_capacity(members.len());
    let mut invalid = 0usize;
    for member in members {
        match serde_json::from_value::<RawEvent>(member) {
            Ok(raw) if raw.event_name().is_ok() => raws.push(raw),
            _ => invalid += 1,
        }
    }
    if invalid > 0 {
        return Err(bad_request(ValidationError::InvalidMembers(invalid)));
    }

    let now = Utc::now();
    let events: Vec<Event> = raws
        .into_iter()
        .map(|raw| raw.enrich(&api_key, now))
        .collect::<Result<_, _>>()
        .map_err(bad_request)?;

    // Fire all dispatches, then check all results. Members after a failed
    // one are still delivered; the response stays all-or-nothing.
    let results = future::join_all(events.iter().map(|event| state.sink.dispatch(event))).await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        error!(batch_size = events.len(), failed, "Failed to queue batch");
        return Err(queue_failure("Failed to queue events"));
    }

    let event_names: BTreeSet<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
    info!(
        batch_size = events.len(),
        event_names = ?event_names,
        "Batch queued"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "accepted",
            "count": events.len(),
            "message": "Events queued for processing",
        })),
    ))
}

/// GET /api/v1/events/schema, a documentary payload with no side effects.
pub async fn event_schema() -> Json<Value> {
    Json(json!({
        "description": "Event ingestion schema - very flexible!",
        "required": ["event_name"],
        "recommended": ["account_id", "timestamp"],
        "optional": ["Any other fields you want to track"],
        "examples": {
            "order_created": {
                "event_name": "order_created",
                "account_id": "account_123",
                "order_id": "ORD-456",
                "amount": 99.99,
                "currency": "USD",
                "customer_id": "CUST-789",
            },
            "subscription_canceled": {
                "event_name": "subscription_canceled",
                "account_id": "account_123",
                "subscription_id": "SUB-456",
                "cancel_reason": "customer_request",
                "mrr_impact": -29.99,
            },
        },
    }))
}

fn queue_failure(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "message": message,
        })),
    )
}
