//! Bridge feedback — messages that force the bridge's switches back to "off".
//!
//! Sent when an activation is refused (the valve did not open, so the switch
//! the user just flipped must flip back) and at startup for every zone, since
//! the hardware is always all-off after a restart.

use serde::{Deserialize, Serialize};

use crate::command::ON_CHARACTERISTIC;
use crate::zone::ZoneId;

/// Payload of a bridge "set characteristic" message.
///
/// Serialises as
/// `{"name":"sprinkler","service_name":"Zone5","characteristic":"On","value":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicUpdate {
    pub name: String,
    pub service_name: String,
    pub characteristic: String,
    pub value: bool,
}

/// A message ready to be published on the bridge topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: CharacteristicUpdate,
}

impl OutboundMessage {
    /// Encode the payload as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.payload)
    }
}

/// Builds feedback messages for one accessory on one bridge topic.
#[derive(Debug, Clone)]
pub struct BridgeFeedback {
    bridge_topic: String,
    accessory: String,
}

impl BridgeFeedback {
    pub fn new(bridge_topic: impl Into<String>, accessory: impl Into<String>) -> Self {
        Self {
            bridge_topic: bridge_topic.into(),
            accessory: accessory.into(),
        }
    }

    #[must_use]
    pub fn bridge_topic(&self) -> &str {
        &self.bridge_topic
    }

    /// Force the bridge switch of `zone_id` to "off".
    #[must_use]
    pub fn correction(&self, zone_id: ZoneId) -> OutboundMessage {
        OutboundMessage {
            topic: self.bridge_topic.clone(),
            payload: CharacteristicUpdate {
                name: self.accessory.clone(),
                service_name: zone_id.bridge_label(),
                characteristic: ON_CHARACTERISTIC.to_string(),
                value: false,
            },
        }
    }

    /// One reset per zone, in the given order.
    pub fn resets<'a>(
        &'a self,
        zones: impl IntoIterator<Item = ZoneId> + 'a,
    ) -> impl Iterator<Item = (ZoneId, OutboundMessage)> + 'a {
        zones
            .into_iter()
            .map(move |zone| (zone, self.correction(zone)))
    }
}
