/// Dead-letter envelopes and the sinks that accept them
use crate::config::ListenerConfig;
use crate::error::{ListenerError, ListenerResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// A message the listener gave up on, plus why
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    pub id: Uuid,
    /// Queue the message was consumed from
    pub queue: String,
    /// Original body, lossily decoded as UTF-8
    pub payload: String,
    pub failure_reason: String,
    /// Handler invocations made before giving up (0 when the body never decoded)
    pub attempts: u32,
    pub failed_at: DateTime<Utc>,
}

impl DeadLetter {
    pub fn new(queue: &str, payload: &[u8], failure_reason: &str, attempts: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue: queue.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
            failure_reason: failure_reason.to_string(),
            attempts,
            failed_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn publish(&self, letter: &DeadLetter) -> ListenerResult<()>;
}

/// Publishes dead letters to a Kafka topic, keyed by the source queue
pub struct KafkaDeadLetterSink {
    producer: FutureProducer,
    topic: String,
    delivery_timeout: Duration,
}

impl KafkaDeadLetterSink {
    pub fn new(producer: FutureProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
            delivery_timeout: Duration::from_secs(30),
        }
    }

    /// Create a sink with its own idempotent producer
    pub fn from_config(config: &ListenerConfig, topic: &str) -> ListenerResult<Self> {
        if topic.trim().is_empty() {
            return Err(ListenerError::InvalidQueue(
                "dead-letter queue name is empty".to_string(),
            ));
        }

        let producer: FutureProducer = config.producer_config().create()?;
        Ok(Self::new(producer, topic))
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl DeadLetterSink for KafkaDeadLetterSink {
    async fn publish(&self, letter: &DeadLetter) -> ListenerResult<()> {
        let body = serde_json::to_string(letter)?;
        let letter_id = letter.id.to_string();

        let headers = OwnedHeaders::new()
            .insert(Header {
                key: "dead_letter_id",
                value: Some(letter_id.as_bytes()),
            })
            .insert(Header {
                key: "source_queue",
                value: Some(letter.queue.as_bytes()),
            })
            .insert(Header {
                key: "failure_reason",
                value: Some(letter.failure_reason.as_bytes()),
            });

        let record = FutureRecord::to(&self.topic)
            .key(&letter.queue)
            .payload(&body)
            .headers(headers);

        self.producer
            .send(record, self.delivery_timeout)
            .await
            .map_err(|(err, _)| ListenerError::DeadLetter(err.to_string()))?;

        info!(
            dead_letter_id = %letter.id,
            source_queue = %letter.queue,
            topic = %self.topic,
            "Message published to dead-letter queue"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_letter_keeps_original_payload() {
        let letter = DeadLetter::new(
            "notification.queue",
            br#"{"recipient":"user@example.com"}"#,
            "permanent failure: rejected",
            1,
        );

        assert_eq!(letter.queue, "notification.queue");
        assert_eq!(letter.payload, r#"{"recipient":"user@example.com"}"#);
        assert_eq!(letter.failure_reason, "permanent failure: rejected");
        assert_eq!(letter.attempts, 1);
    }

    #[test]
    fn test_dead_letter_invalid_utf8_payload() {
        let letter = DeadLetter::new("q", &[0xff, b'o', b'k'], "undecodable", 0);
        assert!(letter.payload.ends_with("ok"));
    }

    #[test]
    fn test_kafka_sink_rejects_empty_topic() {
        let result = KafkaDeadLetterSink::from_config(&ListenerConfig::default(), "  ");
        assert!(matches!(result, Err(ListenerError::InvalidQueue(_))));
    }
}
