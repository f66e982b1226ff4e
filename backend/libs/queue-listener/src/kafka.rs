/// Kafka-backed queue listener
///
/// `bind` subscribes a consumer group member to exactly one queue (topic) and pairs it
/// with a handler. `run_until` then receives messages in order, dispatches each one on the
/// listener task and commits its offset once the message reaches a final disposition.
use crate::config::ListenerConfig;
use crate::dead_letter::DeadLetterSink;
use crate::dispatch::Dispatcher;
use crate::error::{ListenerError, ListenerResult};
use crate::handler::QueueHandler;
use crate::policy::RetryPolicy;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct KafkaQueueListener<H: QueueHandler> {
    consumer: StreamConsumer,
    dispatcher: Dispatcher<H>,
}

impl<H: QueueHandler> KafkaQueueListener<H> {
    /// Bind `handler` to `queue`
    pub fn bind(config: &ListenerConfig, queue: &str, handler: Arc<H>) -> ListenerResult<Self> {
        let queue = queue.trim();
        if queue.is_empty() {
            return Err(ListenerError::InvalidQueue("queue name is empty".to_string()));
        }

        info!(
            "Binding queue listener: brokers={}, group_id={}, queue={}",
            config.brokers, config.group_id, queue
        );

        let consumer: StreamConsumer = config.consumer_config().create()?;
        consumer.subscribe(&[queue])?;

        info!("Successfully subscribed to queue: {}", queue);

        Ok(Self {
            consumer,
            dispatcher: Dispatcher::new(queue, handler),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.dispatcher = self.dispatcher.with_retry_policy(retry_policy);
        self
    }

    pub fn with_dead_letters(mut self, sink: Arc<dyn DeadLetterSink>) -> Self {
        self.dispatcher = self.dispatcher.with_dead_letters(sink);
        self
    }

    pub fn queue(&self) -> &str {
        self.dispatcher.queue()
    }

    /// Consume until `shutdown` resolves. A message already being dispatched is finished
    /// first.
    pub async fn run_until<F>(self, shutdown: F) -> ListenerResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);
        info!(queue = %self.queue(), "Queue listener started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(queue = %self.queue(), "Shutdown requested, stopping queue listener");
                    return Ok(());
                }
                received = self.consumer.recv() => {
                    let message = match received {
                        Ok(m) => m,
                        Err(e) => {
                            warn!(queue = %self.queue(), "Kafka consumer error: {}", e);
                            continue;
                        }
                    };

                    let disposition = match self.dispatcher.dispatch(message.payload()).await {
                        Ok(d) => d,
                        Err(e) => {
                            error!(
                                queue = %self.queue(),
                                partition = message.partition(),
                                offset = message.offset(),
                                "Failed to dead-letter message - NOT committing offset: {}",
                                e
                            );
                            return Err(e);
                        }
                    };

                    debug!(
                        queue = %self.queue(),
                        partition = message.partition(),
                        offset = message.offset(),
                        disposition = disposition.as_str(),
                        "Message processed"
                    );

                    if let Err(e) = self.consumer.commit_message(&message, CommitMode::Async) {
                        warn!(queue = %self.queue(), "Failed to commit Kafka offset: {}", e);
                    }
                }
            }
        }
    }
}
