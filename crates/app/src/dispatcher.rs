//! Dispatcher — the single entry point for inbound broker traffic.
//!
//! Every message goes through parse → resolve → decide → optional feedback,
//! and every path ends in exactly one logged [`Outcome`]. The dispatcher owns
//! the [`ZoneController`], so commands are handled one at a time; the
//! cooldown after an accepted command delays the next one.

use std::time::Duration;

use tokio::sync::mpsc;

use sprinkler_domain::command::ZoneCommand;
use sprinkler_domain::controller::{ControllerState, Decision};
use sprinkler_domain::error::{
    DeliveryError, OutputError, ParseError, PolicyRejection, ResolutionError, TopicMismatch,
};
use sprinkler_domain::feedback::BridgeFeedback;
use sprinkler_domain::zone::ZoneId;

use crate::ports::{Cooldown, InboundEvent, MessageChannel, OutputDriver};
use crate::services::zone_controller::{ControlError, ZoneController};

/// Default quiescent interval after an accepted command.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(100);

/// Terminal outcome of one inbound message.
#[derive(Debug)]
pub enum Outcome {
    AcceptedOn(ZoneId),
    AcceptedOff(ZoneId),
    /// Activation refused; a correction was published for this zone.
    RejectedBusy(ZoneId),
    DroppedMismatch(TopicMismatch),
    DroppedUnknownZone(ZoneId),
    DroppedMalformed(ParseError),
}

/// Failures that need attention beyond a log line.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A feedback message could not be published. Controller state is unaffected.
    #[error("failed to deliver feedback")]
    Delivery(#[from] DeliveryError),

    /// The output driver failed. Controller state is unchanged.
    #[error("failed to drive zone output")]
    Output(#[from] OutputError),
}

/// Failures of the on-connect sequence.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to subscribe to command topic")]
    Subscribe(#[source] DeliveryError),

    #[error("failed to reset {} bridge switch(es)", .failed.len())]
    Reset { failed: Vec<ZoneId> },
}

/// Routes inbound messages through the zone pipeline.
pub struct Dispatcher<D, C, W> {
    controller: ZoneController<D>,
    feedback: BridgeFeedback,
    channel: C,
    cooldown: W,
    cooldown_period: Duration,
}

impl<D, C, W> Dispatcher<D, C, W>
where
    D: OutputDriver,
    C: MessageChannel,
    W: Cooldown,
{
    pub fn new(
        controller: ZoneController<D>,
        feedback: BridgeFeedback,
        channel: C,
        cooldown: W,
        cooldown_period: Duration,
    ) -> Self {
        Self {
            controller,
            feedback,
            channel,
            cooldown,
            cooldown_period,
        }
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    #[must_use]
    pub fn controller(&self) -> &ZoneController<D> {
        &self.controller
    }

    /// Subscribe to the command topic and reset every bridge switch to "off".
    ///
    /// Runs on every (re)connect. Every zone is attempted even when some
    /// publishes fail.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Subscribe`] if the subscription failed, else
    /// [`StartupError::Reset`] listing the zones whose reset was not delivered.
    pub async fn on_connected(&self) -> Result<(), StartupError> {
        let topic = &self.controller.channel().topic;
        let subscribed = self.channel.subscribe(topic).await;
        match &subscribed {
            Ok(()) => tracing::info!(%topic, "subscribed to command topic"),
            Err(err) => tracing::error!(%topic, error = %err, "failed to subscribe"),
        }

        let mut failed = Vec::new();
        let zones = self.controller.registry().zone_ids();
        for (zone, message) in self.feedback.resets(zones) {
            if let Err(err) = self.channel.publish(message).await {
                tracing::error!(%zone, error = %err, "could not reset bridge switch");
                failed.push(zone);
            }
        }

        subscribed.map_err(StartupError::Subscribe)?;
        if failed.is_empty() {
            tracing::info!(
                zones = self.controller.registry().len(),
                "bridge switches reset to off"
            );
            Ok(())
        } else {
            Err(StartupError::Reset { failed })
        }
    }

    /// Handle one inbound message.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when a correction could not be published or
    /// the output driver failed. Every other outcome is `Ok`.
    pub async fn on_message(
        &mut self,
        topic: &str,
        payload: &[u8],
    ) -> Result<Outcome, DispatchError> {
        let command = match ZoneCommand::parse(topic, payload) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(%topic, error = %err, "dropped malformed command");
                return Ok(Outcome::DroppedMalformed(err));
            }
        };

        tracing::debug!(
            zone = %command.zone_id,
            value = command.requested_value,
            characteristic = %command.characteristic,
            "command received"
        );

        let decision = match self.controller.handle(&command) {
            Ok(decision) => decision,
            Err(ControlError::Resolution(ResolutionError::UnknownZone(zone))) => {
                tracing::warn!(%zone, "dropped command for unknown zone");
                return Ok(Outcome::DroppedUnknownZone(zone));
            }
            Err(ControlError::Output(err)) => {
                tracing::error!(zone = %command.zone_id, error = %err, "output write failed");
                return Err(err.into());
            }
        };

        let settle = decision.requires_cooldown();
        let outcome = match decision {
            Decision::Energize(zone) => {
                tracing::info!(%zone, "zone turned on");
                Outcome::AcceptedOn(zone)
            }
            Decision::DeEnergize(zone) => {
                tracing::info!(%zone, "zone turned off");
                Outcome::AcceptedOff(zone)
            }
            Decision::AlreadyOff(zone) => {
                tracing::info!(
                    %zone,
                    active = ?self.controller.state().active_zone(),
                    "zone already off"
                );
                Outcome::AcceptedOff(zone)
            }
            Decision::Reject(PolicyRejection::AlreadyActive { requested }) => {
                tracing::warn!(
                    zone = %requested,
                    active = ?self.controller.state().active_zone(),
                    "a zone is already on, correcting bridge"
                );
                self.channel
                    .publish(self.feedback.correction(requested))
                    .await?;
                Outcome::RejectedBusy(requested)
            }
            Decision::Drop(mismatch) => {
                tracing::warn!(error = %mismatch, "dropped command");
                Outcome::DroppedMismatch(mismatch)
            }
        };

        if settle {
            self.cooldown.wait(self.cooldown_period).await;
        }
        Ok(outcome)
    }

    /// Consume transport events until the channel closes, then switch off the
    /// running zone.
    ///
    /// Returns the dispatcher so callers can inspect the final state.
    pub async fn run(mut self, mut events: mpsc::Receiver<InboundEvent>) -> Self {
        while let Some(event) = events.recv().await {
            match event {
                InboundEvent::Connected => {
                    if let Err(err) = self.on_connected().await {
                        tracing::error!(error = %err, "startup reconciliation incomplete");
                    }
                }
                InboundEvent::Message { topic, payload } => {
                    if let Err(err) = self.on_message(&topic, &payload).await {
                        tracing::error!(error = %err, %topic, "command handling failed");
                    }
                }
            }
        }

        tracing::info!("event channel closed, shutting down dispatcher");
        match self.controller.release() {
            Ok(Some(zone)) => tracing::info!(%zone, "zone turned off on shutdown"),
            Ok(None) => {}
            Err(err) => tracing::error!(error = %err, "failed to switch off zone on shutdown"),
        }
        self
    }
}
