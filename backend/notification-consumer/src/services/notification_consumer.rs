/// Bridges the notification queue to the notification service: one consumed request,
/// one `send` call with that same request.
use super::{NotificationSender, SendError};
use crate::metrics;
use crate::models::NotificationRequest;
use async_trait::async_trait;
use queue_listener::{HandlerError, QueueHandler};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct NotificationConsumer {
    notification_sender: Arc<dyn NotificationSender>,
}

impl NotificationConsumer {
    pub fn new(notification_sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            notification_sender,
        }
    }

    /// Log the request and forward it unchanged. Send failures are returned as-is.
    pub async fn consume(&self, request: NotificationRequest) -> Result<(), SendError> {
        info!("Notification data consumed from queue: {:?}", request);

        let started = Instant::now();
        let result = self.notification_sender.send(request).await;

        let outcome = if result.is_ok() { "sent" } else { "failed" };
        metrics::observe_send(outcome, started.elapsed());

        result
    }
}

#[async_trait]
impl QueueHandler for NotificationConsumer {
    type Message = NotificationRequest;

    async fn handle(&self, message: NotificationRequest) -> Result<(), HandlerError> {
        self.consume(message).await.map_err(HandlerError::from)
    }
}
