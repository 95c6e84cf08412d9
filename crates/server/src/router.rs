//! HTTP router construction.
//!
//! Assembles routes, the authentication layer, and CORS into a single
//! `Router`. Every route except /health sits behind the API key gate.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{api, auth};

pub fn build_router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/api/v1/events", post(api::events::ingest_event))
        .route("/api/v1/events/batch", post(api::events::ingest_batch))
        .route("/api/v1/events/schema", get(api::events::event_schema))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(api::health::health))
        .merge(gated)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
