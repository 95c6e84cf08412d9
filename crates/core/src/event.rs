//! Canonical event shape and the enrichment rule.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ValidationError;

/// Hard cap on batch ingestion size.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Value of `source` when the caller does not supply one.
pub const DEFAULT_SOURCE: &str = "funnel";

/// Sentinel used in queue message attributes when an event has no
/// `account_id`.
pub const UNKNOWN_ACCOUNT: &str = "unknown";

/// An event as submitted by a client.
///
/// The schema is intentionally permissive: only `event_name` is required,
/// and any fields beyond the known ones collect into `extra` and pass
/// through to the queue untouched. `event_name` stays untyped here so
/// validation can report missing, empty and wrong-typed values with one
/// message instead of a deserializer error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An enriched event, ready for dispatch.
///
/// `event_id`, `received_at` and `source` are guaranteed present, and
/// `api_key` always reflects the authenticated caller, never client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_name: String,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub timestamp: String,
    pub received_at: DateTime<Utc>,
    pub source: String,
    pub api_key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawEvent {
    /// Validate and return the event name.
    pub fn event_name(&self) -> Result<&str, ValidationError> {
        match &self.event_name {
            Some(Value::String(name)) if !name.is_empty() => Ok(name),
            _ => Err(ValidationError::MissingEventName),
        }
    }

    /// Enrich this event with gateway metadata.
    ///
    /// `event_id`, `timestamp` and `source` are filled only when the caller
    /// left them out; `received_at` and `api_key` are stamped on every
    /// event. `now` is injected so tests control the clock.
    pub fn enrich(mut self, api_key: &str, now: DateTime<Utc>) -> Result<Event, ValidationError> {
        let event_name = self.event_name()?.to_string();

        // Gateway-owned keys. A client-supplied value must not survive into
        // the serialized message next to the real one.
        self.extra.remove("api_key");
        self.extra.remove("received_at");

        Ok(Event {
            event_name,
            event_id: self.event_id.unwrap_or_else(new_event_id),
            account_id: self.account_id,
            timestamp: self
                .timestamp
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            received_at: now,
            source: self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            api_key: api_key.to_string(),
            extra: self.extra,
        })
    }
}

impl Event {
    /// `account_id`, or the `"unknown"` sentinel for message attributes.
    pub fn account_id_or_unknown(&self) -> &str {
        self.account_id.as_deref().unwrap_or(UNKNOWN_ACCOUNT)
    }
}

fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_enrich_generates_uuid_event_id() {
        let event = raw(json!({"event_name": "order_created"}))
            .enrich("key-1", Utc::now())
            .unwrap();
        assert!(Uuid::parse_str(&event.event_id).is_ok());
    }

    #[test]
    fn test_enrich_preserves_caller_event_id() {
        let event = raw(json!({"event_name": "order_created", "event_id": "evt-42"}))
            .enrich("key-1", Utc::now())
            .unwrap();
        assert_eq!(event.event_id, "evt-42");
    }

    #[test]
    fn test_enrich_defaults_timestamp_and_source() {
        let now = Utc::now();
        let event = raw(json!({"event_name": "login"})).enrich("key-1", now).unwrap();
        assert_eq!(
            event.timestamp,
            now.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        assert_eq!(event.source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_enrich_preserves_caller_timestamp_and_source() {
        let event = raw(json!({
            "event_name": "login",
            "timestamp": "2024-01-01T00:00:00Z",
            "source": "mobile-sdk",
        }))
        .enrich("key-1", Utc::now())
        .unwrap();
        assert_eq!(event.timestamp, "2024-01-01T00:00:00Z");
        assert_eq!(event.source, "mobile-sdk");
    }

    #[test]
    fn test_enrich_stamps_received_at() {
        let before = Utc::now();
        let event = raw(json!({"event_name": "login"}))
            .enrich("key-1", Utc::now())
            .unwrap();
        assert!(event.received_at >= before);
    }

    #[test]
    fn test_enrich_overwrites_client_api_key() {
        let event = raw(json!({
            "event_name": "login",
            "api_key": "spoofed",
            "received_at": "1970-01-01T00:00:00Z",
        }))
        .enrich("real-key", Utc::now())
        .unwrap();
        assert_eq!(event.api_key, "real-key");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["api_key"], "real-key");
        assert_ne!(value["received_at"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let event = raw(json!({
            "event_name": "order_created",
            "order_id": "ORD-456",
            "amount": 99.99,
            "nested": {"currency": "USD"},
        }))
        .enrich("key-1", Utc::now())
        .unwrap();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["order_id"], "ORD-456");
        assert_eq!(value["amount"], 99.99);
        assert_eq!(value["nested"]["currency"], "USD");
    }

    #[test]
    fn test_event_name_missing_empty_or_wrong_type() {
        for body in [json!({}), json!({"event_name": ""}), json!({"event_name": 42})] {
            let err = raw(body).enrich("key-1", Utc::now()).unwrap_err();
            assert_eq!(err, ValidationError::MissingEventName);
        }
    }

    #[test]
    fn test_account_id_sentinel() {
        let with = raw(json!({"event_name": "x", "account_id": "acct-1"}))
            .enrich("k", Utc::now())
            .unwrap();
        let without = raw(json!({"event_name": "x"})).enrich("k", Utc::now()).unwrap();
        assert_eq!(with.account_id_or_unknown(), "acct-1");
        assert_eq!(without.account_id_or_unknown(), UNKNOWN_ACCOUNT);
    }
}
