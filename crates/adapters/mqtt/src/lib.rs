//! # sprinkler-adapter-mqtt
//!
//! MQTT adapter — connects the dispatcher to the broker shared with the bridge.
//!
//! ## How it works
//!
//! [`connect`] builds a rumqttc client and spawns its event loop. The loop
//! forwards `ConnAck` as [`InboundEvent::Connected`] and every `Publish` as
//! [`InboundEvent::Message`] over a bounded channel, in arrival order; the
//! dispatcher consumes that channel on its own task. rumqttc reconnects on the
//! next poll after an error, and each new `ConnAck` triggers the startup
//! sequence again.
//!
//! Outbound requests use the client's non-blocking `try_*` calls, so a full
//! request queue is reported as a delivery error instead of stalling the
//! command path.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `sprinkler-app` and `sprinkler-domain`.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::future::Future;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use sprinkler_app::ports::{InboundEvent, MessageChannel};
use sprinkler_domain::error::DeliveryError;
use sprinkler_domain::feedback::OutboundMessage;

/// [`MessageChannel`] backed by a rumqttc [`AsyncClient`].
#[derive(Clone)]
pub struct MqttChannel {
    client: AsyncClient,
    qos: QoS,
}

impl MqttChannel {
    /// Wrap a client. Everything is sent at QoS 0, as the bridge expects.
    #[must_use]
    pub fn new(client: AsyncClient) -> Self {
        Self {
            client,
            qos: QoS::AtMostOnce,
        }
    }
}

impl MessageChannel for MqttChannel {
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        let result = self
            .client
            .try_subscribe(topic, self.qos)
            .map_err(|err| MqttError::Client(err).into_delivery(topic));
        async { result }
    }

    fn publish(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        let result = message
            .encode()
            .map_err(MqttError::Encode)
            .and_then(|bytes| {
                self.client
                    .try_publish(message.topic.as_str(), self.qos, false, bytes)
                    .map_err(MqttError::Client)
            })
            .map_err(|err| err.into_delivery(&message.topic));
        async { result }
    }
}

/// Translate a rumqttc event into a dispatcher event.
#[must_use]
pub fn map_event(event: Event) -> Option<InboundEvent> {
    match event {
        Event::Incoming(Packet::ConnAck(_)) => Some(InboundEvent::Connected),
        Event::Incoming(Packet::Publish(publish)) => Some(InboundEvent::Message {
            topic: publish.topic,
            payload: publish.payload.to_vec(),
        }),
        _ => None,
    }
}

/// Create the client and spawn its event loop.
///
/// Returns the outbound channel, the ordered inbound event stream and the
/// event loop task. Aborting the task closes the stream.
#[must_use]
pub fn connect(
    config: &MqttConfig,
) -> (MqttChannel, mpsc::Receiver<InboundEvent>, JoinHandle<()>) {
    let mut options = MqttOptions::new(
        config.client_id.clone(),
        config.broker_host.clone(),
        config.broker_port,
    );
    options.set_keep_alive(config.keep_alive());
    options.set_clean_session(true);

    let (client, eventloop) = AsyncClient::new(options, config.channel_capacity);
    let (tx, rx) = mpsc::channel(config.channel_capacity);

    tracing::info!(
        host = %config.broker_host,
        port = config.broker_port,
        client_id = %config.client_id,
        "connecting to MQTT broker"
    );
    let handle = tokio::spawn(run_event_loop(eventloop, tx, config.reconnect_delay()));

    (MqttChannel::new(client), rx, handle)
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    tx: mpsc::Sender<InboundEvent>,
    reconnect_delay: Duration,
) {
    loop {
        match eventloop.poll().await {
            Ok(event) => {
                let Some(inbound) = map_event(event) else {
                    continue;
                };
                if inbound == InboundEvent::Connected {
                    tracing::info!("MQTT connected");
                }
                if tx.send(inbound).await.is_err() {
                    tracing::debug!("dispatcher gone, stopping MQTT event loop");
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "MQTT connection error, retrying");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
