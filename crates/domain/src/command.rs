//! Zone command — decoded inbound instruction from the bridge.
//!
//! Wire format (JSON object, extra fields ignored):
//!
//! ```json
//! { "value": "true", "service_name": 2, "characteristic": "On", "name": "sprinkler" }
//! ```
//!
//! `value` is a **string**, not a JSON boolean. Only the exact string
//! `"true"` requests activation; every other string means "not true". A JSON
//! boolean in that field is rejected as malformed, matching the bridge's
//! existing payloads.

use serde::Deserialize;

use crate::error::ParseError;
use crate::zone::ZoneId;

/// The only `value` string that requests activation.
pub const ACTIVATE_VALUE: &str = "true";

/// Characteristic that switches a zone on.
pub const ON_CHARACTERISTIC: &str = "On";

#[derive(Deserialize)]
struct WireCommand {
    value: String,
    service_name: ZoneId,
    characteristic: String,
    #[serde(default)]
    name: Option<String>,
}

/// A validated command for one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneCommand {
    /// Topic the message arrived on.
    pub topic: String,
    /// Accessory named in the payload, if any.
    pub accessory_name: Option<String>,
    pub zone_id: ZoneId,
    pub characteristic: String,
    /// `true` iff the wire `value` was exactly `"true"`.
    pub requested_value: bool,
}

impl ZoneCommand {
    /// Decode a raw payload received on `topic`.
    ///
    /// Performs no validation of `characteristic` beyond its type.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedPayload`] if `value`, `service_name` or
    /// `characteristic` is missing or mistyped.
    pub fn parse(topic: &str, payload: &[u8]) -> Result<Self, ParseError> {
        let wire: WireCommand =
            serde_json::from_slice(payload).map_err(ParseError::MalformedPayload)?;
        Ok(Self {
            topic: topic.to_string(),
            accessory_name: wire.name,
            zone_id: wire.service_name,
            requested_value: wire.value == ACTIVATE_VALUE,
            characteristic: wire.characteristic,
        })
    }

    /// Whether this command asks to switch its zone on.
    #[must_use]
    pub fn requests_activation(&self) -> bool {
        self.requested_value
    }

    /// Whether the command targets the `On` characteristic.
    #[must_use]
    pub fn targets_on(&self) -> bool {
        self.characteristic == ON_CHARACTERISTIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPIC: &str = "home/sprinkler";

    fn parse(payload: &str) -> Result<ZoneCommand, ParseError> {
        ZoneCommand::parse(TOPIC, payload.as_bytes())
    }

    #[test]
    fn should_parse_activation_command() {
        let cmd = parse(r#"{"value":"true","service_name":2,"characteristic":"On"}"#).unwrap();
        assert_eq!(cmd.topic, TOPIC);
        assert_eq!(cmd.zone_id, ZoneId::new(2));
        assert_eq!(cmd.characteristic, "On");
        assert!(cmd.requests_activation());
        assert!(cmd.targets_on());
        assert_eq!(cmd.accessory_name, None);
    }

    #[test]
    fn should_treat_any_other_string_as_not_true() {
        for value in ["false", "TRUE", "True", " true", "1", ""] {
            let payload =
                format!(r#"{{"value":"{value}","service_name":2,"characteristic":"On"}}"#);
            let cmd = parse(&payload).unwrap();
            assert!(!cmd.requests_activation(), "value {value:?} must not activate");
        }
    }

    #[test]
    fn should_reject_boolean_value() {
        let result = parse(r#"{"value":true,"service_name":2,"characteristic":"On"}"#);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
    }

    #[test]
    fn should_reject_missing_service_name() {
        let result = parse(r#"{"value":"true","characteristic":"On"}"#);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
    }

    #[test]
    fn should_reject_string_service_name() {
        let result = parse(r#"{"value":"true","service_name":"Zone2","characteristic":"On"}"#);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
    }

    #[test]
    fn should_reject_missing_characteristic() {
        let result = parse(r#"{"value":"true","service_name":2}"#);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
    }

    #[test]
    fn should_reject_non_object_payload() {
        assert!(parse("[1,2,3]").is_err());
        assert!(parse("not json").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn should_keep_unrecognised_characteristic() {
        let cmd =
            parse(r#"{"value":"true","service_name":4,"characteristic":"Brightness"}"#).unwrap();
        assert_eq!(cmd.characteristic, "Brightness");
        assert!(!cmd.targets_on());
    }

    #[test]
    fn should_capture_accessory_name_when_present() {
        let cmd = parse(
            r#"{"name":"sprinkler","value":"false","service_name":9,"characteristic":"On"}"#,
        )
        .unwrap();
        assert_eq!(cmd.accessory_name.as_deref(), Some("sprinkler"));
    }

    #[test]
    fn should_ignore_unknown_fields() {
        let cmd = parse(
            r#"{"value":"true","service_name":1,"characteristic":"On","service_type":"Switch"}"#,
        )
        .unwrap();
        assert_eq!(cmd.zone_id, ZoneId::new(1));
    }
}
