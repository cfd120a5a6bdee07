//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `sprinkler.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use sprinkler_adapter_mqtt::MqttConfig;
use sprinkler_domain::controller::ChannelIdentity;
use sprinkler_domain::error::RegistryError;
use sprinkler_domain::feedback::BridgeFeedback;
use sprinkler_domain::registry::{DEFAULT_ZONE_TABLE, ZoneRegistry};
use sprinkler_domain::zone::{OutputHandle, ZoneEntry, ZoneId};

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection settings.
    pub mqtt: MqttConfig,
    /// Topics, accessory name and pacing.
    pub controller: ControllerConfig,
    /// Zone table. Replaces the factory table when present.
    pub zones: Vec<ZoneConfig>,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Controller channel configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Topic the bridge publishes zone commands on.
    pub command_topic: String,
    /// Topic the bridge listens on for characteristic updates.
    pub bridge_topic: String,
    /// Accessory name shared with the bridge.
    pub accessory: String,
    /// Quiescent interval after an accepted command, in milliseconds.
    pub cooldown_ms: u64,
}

/// One `[[zones]]` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ZoneConfig {
    pub id: u16,
    pub pin: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `sprinkler.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("sprinkler.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SPRINKLER_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(port) = var("SPRINKLER_MQTT_PORT").and_then(|val| val.parse().ok()) {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = var("SPRINKLER_CLIENT_ID") {
            self.mqtt.client_id = val;
        }
        if let Some(ms) = var("SPRINKLER_COOLDOWN_MS").and_then(|val| val.parse().ok()) {
            self.controller.cooldown_ms = ms;
        }
        if let Some(val) = var("SPRINKLER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "broker port must be non-zero".to_string(),
            ));
        }
        if self.mqtt.channel_capacity == 0 {
            return Err(ConfigError::Validation(
                "channel capacity must be non-zero".to_string(),
            ));
        }
        for (name, value) in [
            ("command topic", &self.controller.command_topic),
            ("bridge topic", &self.controller.bridge_topic),
            ("accessory", &self.controller.accessory),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        self.zone_registry()?;
        Ok(())
    }

    /// Build the zone registry from the `[[zones]]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Registry`] for an empty table or duplicate rows.
    pub fn zone_registry(&self) -> Result<ZoneRegistry, ConfigError> {
        let entries = self
            .zones
            .iter()
            .map(|zone| ZoneEntry::new(ZoneId::new(zone.id), OutputHandle::new(zone.pin)));
        Ok(ZoneRegistry::new(entries)?)
    }

    #[must_use]
    pub fn channel_identity(&self) -> ChannelIdentity {
        ChannelIdentity::new(
            self.controller.command_topic.clone(),
            self.controller.accessory.clone(),
        )
    }

    #[must_use]
    pub fn feedback(&self) -> BridgeFeedback {
        BridgeFeedback::new(
            self.controller.bridge_topic.clone(),
            self.controller.accessory.clone(),
        )
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.controller.cooldown_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig::default(),
            controller: ControllerConfig::default(),
            zones: DEFAULT_ZONE_TABLE
                .iter()
                .map(|&(id, pin)| ZoneConfig { id, pin })
                .collect(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            command_topic: "home/sprinkler".to_string(),
            bridge_topic: "homebridge/to/set".to_string(),
            accessory: "sprinkler".to_string(),
            cooldown_ms: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sprinklerd=info,sprinkler=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// The zone table is unusable.
    #[error("invalid zone table")]
    Registry(#[from] RegistryError),
}
