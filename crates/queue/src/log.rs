//! Logging fallback sink.

use async_trait::async_trait;
use tracing::info;

use funnel_core::Event;

use crate::error::DispatchError;
use crate::sink::EventSink;

/// No-queue fallback used when SQS is not configured.
///
/// Dispatch always succeeds, but the event is not swallowed silently: a
/// structured record with the correlating fields is emitted so operators
/// keep an audit trail in degraded mode.
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    async fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        info!(
            event_id = %event.event_id,
            event_name = %event.event_name,
            account_id = %event.account_id_or_unknown(),
            timestamp = %event.timestamp,
            "Event accepted (no queue configured)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use funnel_core::RawEvent;
    use serde_json::json;

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let event = serde_json::from_value::<RawEvent>(json!({"event_name": "login"}))
            .unwrap()
            .enrich("key-1", Utc::now())
            .unwrap();
        assert!(LogSink.dispatch(&event).await.is_ok());
    }
}
