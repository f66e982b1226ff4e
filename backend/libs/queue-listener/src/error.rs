//! Error types for the queue listener library

use thiserror::Error;

/// Result type for listener operations
pub type ListenerResult<T> = Result<T, ListenerError>;

/// Errors raised by the listener itself (broker, binding, dead-lettering)
#[derive(Error, Debug)]
pub enum ListenerError {
    /// Kafka client failure (consumer/producer creation, subscription)
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// Queue name rejected at bind time
    #[error("Invalid queue name: {0}")]
    InvalidQueue(String),

    /// The dead-letter queue did not accept a rejected message
    #[error("Dead-letter publish failed: {0}")]
    DeadLetter(String),

    /// JSON serialization error for dead-letter envelopes
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a [`crate::QueueHandler`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Retrying the same message may succeed (downstream unavailable, timeout)
    #[error("transient failure: {0}")]
    Transient(String),

    /// Retrying the same message will fail again
    #[error("permanent failure: {0}")]
    Permanent(String),
}

impl HandlerError {
    /// Check if the failure is worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, HandlerError::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_classification() {
        assert!(HandlerError::Transient("timeout".into()).is_transient());
        assert!(!HandlerError::Permanent("bad request".into()).is_transient());
    }

    #[test]
    fn test_handler_error_display() {
        let err = HandlerError::Permanent("recipient missing".into());
        assert_eq!(err.to_string(), "permanent failure: recipient missing");
    }
}
