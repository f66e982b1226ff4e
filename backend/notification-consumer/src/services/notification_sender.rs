/// Outbound capability: hand a request to the notification service
use crate::models::NotificationRequest;
use async_trait::async_trait;
use queue_listener::HandlerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    /// The service refused this request; sending it again will not help
    #[error("notification rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("notification service unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SendError::Rejected { .. } => false,
            SendError::Unavailable(_) => true,
            // Only a request that could not be built will fail the same way again
            SendError::Transport(e) => !e.is_builder(),
        }
    }
}

impl From<SendError> for HandlerError {
    fn from(e: SendError) -> Self {
        if e.is_retryable() {
            HandlerError::Transient(e.to_string())
        } else {
            HandlerError::Permanent(e.to_string())
        }
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, request: NotificationRequest) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_maps_to_permanent() {
        let err = SendError::Rejected {
            status: 400,
            body: "missing recipient".to_string(),
        };
        assert!(!err.is_retryable());

        let handler_err: HandlerError = err.into();
        assert_eq!(
            handler_err,
            HandlerError::Permanent("notification rejected (status 400): missing recipient".to_string())
        );
    }

    #[test]
    fn test_unavailable_maps_to_transient() {
        let handler_err: HandlerError = SendError::Unavailable("status 503".to_string()).into();
        assert!(handler_err.is_transient());
    }
}
