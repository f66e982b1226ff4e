pub mod http_sender;
pub mod notification_consumer;
pub mod notification_sender;

pub use http_sender::*;
pub use notification_consumer::*;
pub use notification_sender::*;
