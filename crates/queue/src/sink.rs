//! Sink trait and the once-at-startup variant selection.

use async_trait::async_trait;
use tracing::info;

use funnel_core::{Config, Event};

use crate::error::DispatchError;
use crate::log::LogSink;
use crate::sqs::SqsSink;

/// Destination for enriched events.
///
/// `dispatch` delivers exactly one event; a batch is a set of independent
/// single dispatches, not a transaction. Implementations must be safe for
/// concurrent use and must not serialize dispatches behind a lock.
/// Failed dispatches are not retried at this layer.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn dispatch(&self, event: &Event) -> Result<(), DispatchError>;
}

/// The two sink variants the gateway can run with.
///
/// Selected once from config at process start and fixed for the process
/// lifetime; there is no runtime failover between variants.
pub enum QueueSink {
    Durable(SqsSink),
    Logging(LogSink),
}

impl QueueSink {
    /// Select and construct the sink variant for this process.
    pub async fn from_config(config: &Config) -> Result<Self, DispatchError> {
        if config.queue_configured() {
            let sink = SqsSink::new(&config.aws, &config.queue).await?;
            Ok(QueueSink::Durable(sink))
        } else {
            info!("No queue configured, events will be logged only");
            Ok(QueueSink::Logging(LogSink))
        }
    }

    /// Short name of the active variant, for health reporting.
    pub fn provider(&self) -> &'static str {
        match self {
            QueueSink::Durable(_) => "sqs",
            QueueSink::Logging(_) => "log",
        }
    }
}

#[async_trait]
impl EventSink for QueueSink {
    async fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        match self {
            QueueSink::Durable(sink) => sink.dispatch(event).await,
            QueueSink::Logging(sink) => sink.dispatch(event).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_logging_variant() {
        assert_eq!(QueueSink::Logging(LogSink).provider(), "log");
    }
}
