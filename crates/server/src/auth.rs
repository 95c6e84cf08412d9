//! API key authentication middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Dedicated API key header. Wins over `Authorization: Bearer` when both
/// are present.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The authenticated credential, attached to the request as an extension
/// once validation passes and threaded into enrichment from there.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

/// Gate every route except the health probe.
///
/// Runs before body parsing, so no validation or enrichment work is spent
/// on unauthenticated traffic. The membership check itself is a
/// synchronous in-memory lookup.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(key) = credential_from_headers(request.headers()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "message": "API key required. Provide via X-API-Key header or Authorization: Bearer <key>",
            })),
        )
            .into_response();
    };

    if !state.credentials.contains(&key) {
        // Deliberately generic: must not reveal which part of validation failed.
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Forbidden",
                "message": "Invalid API key",
            })),
        )
            .into_response();
    }

    request.extensions_mut().insert(ApiKey(key));
    next.run(request).await
}

fn credential_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return Some(key.to_string());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_no_credential() {
        assert_eq!(credential_from_headers(&headers(&[])), None);
    }

    #[test]
    fn test_api_key_header() {
        let h = headers(&[("x-api-key", "key-1")]);
        assert_eq!(credential_from_headers(&h).as_deref(), Some("key-1"));
    }

    #[test]
    fn test_bearer_authorization() {
        let h = headers(&[("authorization", "Bearer key-2")]);
        assert_eq!(credential_from_headers(&h).as_deref(), Some("key-2"));
    }

    #[test]
    fn test_dedicated_header_wins_over_bearer() {
        let h = headers(&[("x-api-key", "key-1"), ("authorization", "Bearer key-2")]);
        assert_eq!(credential_from_headers(&h).as_deref(), Some("key-1"));
    }

    #[test]
    fn test_non_bearer_authorization_ignored() {
        let h = headers(&[("authorization", "Basic abc")]);
        assert_eq!(credential_from_headers(&h), None);
    }

    #[test]
    fn test_empty_values_ignored() {
        let h = headers(&[("x-api-key", ""), ("authorization", "Bearer ")]);
        assert_eq!(credential_from_headers(&h), None);
    }
}
