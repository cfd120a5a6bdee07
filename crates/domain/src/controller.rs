//! Controller state machine — the single-active-zone policy.
//!
//! The whole sprinkler system is one resource: at most one zone may be
//! energized at any instant. [`ControllerState::decide`] turns a resolved
//! [`ZoneCommand`] into a [`Decision`] without side effects; the caller
//! performs the output action and then [`commits`](ControllerState::commit)
//! the decision.
//!
//! Evaluation order:
//!
//! 1. Activation while a zone is active → [`Decision::Reject`]. This runs
//!    before the topic check so a second zone is never energized.
//! 2. Topic or accessory mismatch → [`Decision::Drop`].
//! 3. Activation of `On` while idle → [`Decision::Energize`].
//! 4. Anything else → switch the zone off ([`Decision::DeEnergize`] when it is
//!    the running zone, [`Decision::AlreadyOff`] otherwise).

use crate::command::ZoneCommand;
use crate::error::{PolicyRejection, TopicMismatch};
use crate::zone::ZoneId;

/// The topic and accessory this controller instance answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentity {
    pub topic: String,
    pub accessory: String,
}

impl ChannelIdentity {
    pub fn new(topic: impl Into<String>, accessory: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            accessory: accessory.into(),
        }
    }

    /// Check that a command is addressed to this controller.
    ///
    /// A command without an accessory name is identified by its topic alone.
    ///
    /// # Errors
    ///
    /// Returns [`TopicMismatch`] when the topic or the accessory differ.
    pub fn admit(&self, command: &ZoneCommand) -> Result<(), TopicMismatch> {
        let accessory_ok = command
            .accessory_name
            .as_deref()
            .is_none_or(|name| name == self.accessory);
        if command.topic == self.topic && accessory_ok {
            Ok(())
        } else {
            Err(TopicMismatch {
                topic: command.topic.clone(),
                accessory: command.accessory_name.clone(),
            })
        }
    }
}

/// Global controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Every output is de-energized.
    #[default]
    Idle,
    /// Exactly one zone is energized.
    Active(ZoneId),
}

/// Outcome of evaluating one command against the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Idle → Active: energize the zone.
    Energize(ZoneId),
    /// Active → Idle: de-energize the running zone.
    DeEnergize(ZoneId),
    /// Accepted "off" for a zone that is already de-energized.
    AlreadyOff(ZoneId),
    /// Refused activation; the bridge must be corrected.
    Reject(PolicyRejection),
    /// Not addressed to this controller.
    Drop(TopicMismatch),
}

impl Decision {
    /// Accepted commands are followed by the quiescent interval.
    #[must_use]
    pub fn requires_cooldown(&self) -> bool {
        matches!(
            self,
            Self::Energize(_) | Self::DeEnergize(_) | Self::AlreadyOff(_)
        )
    }
}

impl ControllerState {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// The energized zone, if any.
    #[must_use]
    pub fn active_zone(self) -> Option<ZoneId> {
        match self {
            Self::Active(zone) => Some(zone),
            Self::Idle => None,
        }
    }

    /// Evaluate a command whose zone has already been resolved.
    #[must_use]
    pub fn decide(self, command: &ZoneCommand, channel: &ChannelIdentity) -> Decision {
        if self.is_active() && command.requests_activation() {
            return Decision::Reject(PolicyRejection::AlreadyActive {
                requested: command.zone_id,
            });
        }

        if let Err(mismatch) = channel.admit(command) {
            return Decision::Drop(mismatch);
        }

        let zone = command.zone_id;
        if command.requests_activation() && command.targets_on() {
            return Decision::Energize(zone);
        }

        match self {
            Self::Active(active) if active == zone => Decision::DeEnergize(zone),
            _ => Decision::AlreadyOff(zone),
        }
    }

    /// Apply a decision after its output action succeeded.
    pub fn commit(&mut self, decision: &Decision) {
        match decision {
            Decision::Energize(zone) => *self = Self::Active(*zone),
            Decision::DeEnergize(_) => *self = Self::Idle,
            Decision::AlreadyOff(_) | Decision::Reject(_) | Decision::Drop(_) => {}
        }
    }
}
