//! # Queue Listener Library
//!
//! Binds a message handler to a named Kafka queue (topic) with an explicit call made at
//! process startup, instead of declaring subscriptions in metadata.
//!
//! ## Delivery
//!
//! Every message received from the queue goes through a [`Dispatcher`]:
//! - the JSON body is decoded into the handler's message type
//! - the handler is invoked on the listener task, one message at a time
//! - transient handler failures are retried with capped exponential backoff
//! - permanent failures (and undecodable bodies) go to the dead-letter queue when one is
//!   configured, otherwise they are logged and dropped
//!
//! Offsets are committed only once a message reaches a final [`Disposition`].
//!
//! ## Usage Example
//!
//! ```ignore
//! use queue_listener::{HandlerError, KafkaQueueListener, ListenerConfig, QueueHandler};
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! #[async_trait::async_trait]
//! impl QueueHandler for Greeter {
//!     type Message = String;
//!
//!     async fn handle(&self, message: String) -> Result<(), HandlerError> {
//!         println!("hello {message}");
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let listener = KafkaQueueListener::bind(&ListenerConfig::default(), "greetings", Arc::new(Greeter))?;
//! listener
//!     .run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dead_letter;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod kafka;
pub mod policy;

pub use config::ListenerConfig;
pub use dead_letter::{DeadLetter, DeadLetterSink, KafkaDeadLetterSink};
pub use dispatch::{Dispatcher, Disposition};
pub use error::{HandlerError, ListenerError, ListenerResult};
pub use handler::QueueHandler;
pub use kafka::KafkaQueueListener;
pub use policy::RetryPolicy;
