//! AWS SQS sink implementation.

use std::time::Duration;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_sqs::config::{BehaviorVersion, Region};
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;
use tracing::{debug, info};

use funnel_core::config::{AwsConfig, QueueConfig};
use funnel_core::Event;

use crate::error::DispatchError;
use crate::sink::EventSink;

/// SQS-backed durable sink.
///
/// Serializes the full enriched event as the message body and attaches
/// `event_name` and `account_id` attributes so downstream consumers can
/// route and filter without deserializing the body. The underlying client
/// is connection-pooled and safe for concurrent use.
pub struct SqsSink {
    client: Client,
    queue_url: String,
    dispatch_timeout: Duration,
}

impl SqsSink {
    /// Create a new SQS sink from project config.
    pub async fn new(aws: &AwsConfig, queue: &QueueConfig) -> Result<Self, DispatchError> {
        let queue_url = queue
            .queue_url
            .clone()
            .ok_or_else(|| DispatchError::Config("SQS_QUEUE_URL is not set".into()))?;
        let region = aws
            .region
            .clone()
            .ok_or_else(|| DispatchError::Config("AWS_REGION is not set".into()))?;

        // Build the client config directly rather than through
        // aws_config::defaults(), which reads endpoint and credential
        // overrides from ambient environment discovery meant for other
        // AWS services.
        let mut sqs_config = aws_sdk_sqs::Config::builder()
            .region(Region::new(region))
            .behavior_version(BehaviorVersion::latest());

        // Static credentials when provided (local dev / explicit config).
        if let (Some(key_id), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
            let creds = Credentials::new(
                key_id,
                secret,
                aws.session_token.clone(),
                None,
                "funnel-queue-static",
            );
            sqs_config = sqs_config.credentials_provider(creds);
        }

        if let Some(endpoint) = &queue.endpoint_url {
            let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                endpoint.clone()
            } else {
                format!("https://{endpoint}")
            };
            sqs_config = sqs_config.endpoint_url(&url);
        }

        let client = Client::from_conf(sqs_config.build());

        info!(queue_url = %queue_url, "SQS sink initialized");

        Ok(Self {
            client,
            queue_url,
            dispatch_timeout: Duration::from_secs(queue.dispatch_timeout_secs),
        })
    }
}

fn string_attribute(value: &str) -> Result<MessageAttributeValue, DispatchError> {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()
        .map_err(|e| DispatchError::Attribute(format!("{e:?}")))
}

#[async_trait]
impl EventSink for SqsSink {
    /// Send one event. A failure (network error, queue rejection,
    /// throttling, timeout) surfaces immediately and is not retried here;
    /// retry policy belongs to the caller.
    async fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        let body =
            serde_json::to_string(event).map_err(|e| DispatchError::Serialize(e.to_string()))?;

        let send = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .message_attributes("event_name", string_attribute(&event.event_name)?)
            .message_attributes("account_id", string_attribute(event.account_id_or_unknown())?)
            .send();

        let resp = tokio::time::timeout(self.dispatch_timeout, send)
            .await
            .map_err(|_| DispatchError::Timeout(self.dispatch_timeout.as_millis() as u64))?
            .map_err(|e| DispatchError::Send(format!("SQS send failed: {e:?}")))?;

        debug!(
            event_id = %event.event_id,
            message_id = resp.message_id().unwrap_or("unknown"),
            "Event dispatched to SQS"
        );

        Ok(())
    }
}
