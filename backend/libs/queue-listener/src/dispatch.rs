/// Decode -> handle -> retry -> dead-letter, independent of the broker client
use crate::dead_letter::{DeadLetter, DeadLetterSink};
use crate::error::{HandlerError, ListenerResult};
use crate::handler::QueueHandler;
use crate::policy::RetryPolicy;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Final outcome for one received message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The handler succeeded on attempt `attempts`
    Handled { attempts: u32 },
    /// Message had no body
    Skipped,
    DeadLettered { reason: String },
    /// Gave up and no dead-letter queue is configured
    Dropped { reason: String },
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Handled { .. } => "handled",
            Disposition::Skipped => "skipped",
            Disposition::DeadLettered { .. } => "dead_lettered",
            Disposition::Dropped { .. } => "dropped",
        }
    }
}

pub struct Dispatcher<H: QueueHandler> {
    queue: String,
    handler: Arc<H>,
    retry_policy: RetryPolicy,
    dead_letters: Option<Arc<dyn DeadLetterSink>>,
}

impl<H: QueueHandler> Dispatcher<H> {
    pub fn new(queue: impl Into<String>, handler: Arc<H>) -> Self {
        Self {
            queue: queue.into(),
            handler,
            retry_policy: RetryPolicy::default(),
            dead_letters: None,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_dead_letters(mut self, sink: Arc<dyn DeadLetterSink>) -> Self {
        self.dead_letters = Some(sink);
        self
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Drive one raw message to a final disposition.
    ///
    /// Errors only when a rejected message could not be dead-lettered; the caller must
    /// then leave the offset uncommitted.
    pub async fn dispatch(&self, payload: Option<&[u8]>) -> ListenerResult<Disposition> {
        let payload = match payload {
            Some(p) => p,
            None => {
                warn!(queue = %self.queue, "Received message with no payload, skipping");
                return Ok(Disposition::Skipped);
            }
        };

        let message: H::Message = match serde_json::from_slice(payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(queue = %self.queue, error = %e, "Failed to decode message from queue");
                return self
                    .reject(payload, format!("undecodable payload: {}", e), 0)
                    .await;
            }
        };

        let mut retries = 0;
        loop {
            match self.handler.handle(message.clone()).await {
                Ok(()) => {
                    debug!(queue = %self.queue, attempts = retries + 1, "Message handled");
                    return Ok(Disposition::Handled {
                        attempts: retries + 1,
                    });
                }
                Err(HandlerError::Transient(reason)) if self.retry_policy.should_retry(retries) => {
                    let delay = self.retry_policy.get_backoff(retries);
                    retries += 1;
                    warn!(
                        queue = %self.queue,
                        reason = %reason,
                        "Retry attempt {}/{}, waiting {:?}",
                        retries,
                        self.retry_policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return self.reject(payload, e.to_string(), retries + 1).await,
            }
        }
    }

    async fn reject(
        &self,
        payload: &[u8],
        reason: String,
        attempts: u32,
    ) -> ListenerResult<Disposition> {
        match &self.dead_letters {
            Some(sink) => {
                let letter = DeadLetter::new(&self.queue, payload, &reason, attempts);
                sink.publish(&letter).await?;
                warn!(
                    queue = %self.queue,
                    attempts,
                    reason = %reason,
                    "Message moved to dead-letter queue"
                );
                Ok(Disposition::DeadLettered { reason })
            }
            None => {
                error!(
                    queue = %self.queue,
                    attempts,
                    reason = %reason,
                    "Dropping message: no dead-letter queue configured"
                );
                Ok(Disposition::Dropped { reason })
            }
        }
    }
}
