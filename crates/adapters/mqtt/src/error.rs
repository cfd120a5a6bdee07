//! MQTT adapter error types.

use sprinkler_domain::error::DeliveryError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected the request (event loop gone or queue closed).
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to encode an outbound payload as JSON.
    #[error("failed to encode MQTT payload")]
    Encode(#[source] serde_json::Error),
}

impl MqttError {
    /// Convert into a [`DeliveryError`] for propagation across the port boundary.
    #[must_use]
    pub fn into_delivery(self, topic: &str) -> DeliveryError {
        DeliveryError::new(topic, self)
    }
}
