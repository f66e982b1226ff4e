use crate::error::HandlerError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A function bound to a queue: receives one decoded message per invocation.
///
/// `Message` is cloned for every delivery attempt so the handler can take it by value.
#[async_trait]
pub trait QueueHandler: Send + Sync {
    type Message: DeserializeOwned + Clone + Debug + Send + Sync;

    async fn handle(&self, message: Self::Message) -> Result<(), HandlerError>;
}
