//! Messaging channel port — the broker connection shared with the bridge.

use std::future::Future;

use sprinkler_domain::error::DeliveryError;
use sprinkler_domain::feedback::OutboundMessage;

/// Notifications forwarded by the transport, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The broker accepted the connection (first connect or reconnect).
    Connected,
    /// A message arrived on a subscribed topic.
    Message { topic: String, payload: Vec<u8> },
}

/// Outbound side of the broker connection.
pub trait MessageChannel: Send + Sync {
    /// Subscribe to `topic`.
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Publish a feedback message.
    fn publish(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<T: MessageChannel> MessageChannel for std::sync::Arc<T> {
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).subscribe(topic)
    }

    fn publish(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).publish(message)
    }
}
