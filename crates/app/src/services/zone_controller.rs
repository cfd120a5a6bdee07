//! Zone controller — resolves a command, applies the policy and drives outputs.

use sprinkler_domain::command::ZoneCommand;
use sprinkler_domain::controller::{ChannelIdentity, ControllerState, Decision};
use sprinkler_domain::error::{OutputError, ResolutionError};
use sprinkler_domain::registry::ZoneRegistry;
use sprinkler_domain::zone::{OutputHandle, ZoneId};

use crate::ports::OutputDriver;

/// Owns the controller state and the output driver.
///
/// State only changes after the output write succeeded.
pub struct ZoneController<D> {
    registry: ZoneRegistry,
    channel: ChannelIdentity,
    driver: D,
    state: ControllerState,
}

impl<D: OutputDriver> ZoneController<D> {
    /// Create an idle controller. Outputs are assumed de-energized.
    pub fn new(registry: ZoneRegistry, channel: ChannelIdentity, driver: D) -> Self {
        Self {
            registry,
            channel,
            driver,
            state: ControllerState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    #[must_use]
    pub fn channel(&self) -> &ChannelIdentity {
        &self.channel
    }

    /// Resolve the command's zone, decide, and perform the output action.
    ///
    /// An unknown zone returns before any decision is made, whatever the
    /// command asks for.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Resolution`] for an unregistered zone and
    /// [`ControlError::Output`] when the driver fails; in both cases the
    /// state is unchanged.
    #[tracing::instrument(skip(self, command), fields(zone = %command.zone_id))]
    pub fn handle(&mut self, command: &ZoneCommand) -> Result<Decision, ControlError> {
        let output = self.registry.resolve(command.zone_id)?;
        let decision = self.state.decide(command, &self.channel);

        match &decision {
            Decision::Energize(_) => self.driver.set_output(output, true)?,
            Decision::DeEnergize(_) => self.driver.set_output(output, false)?,
            Decision::AlreadyOff(_) | Decision::Reject(_) | Decision::Drop(_) => {}
        }

        self.state.commit(&decision);
        Ok(decision)
    }

    /// De-energize the running zone, if any, and go idle.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Output`] if the driver fails; the state then
    /// still reports the zone as active.
    pub fn release(&mut self) -> Result<Option<ZoneId>, ControlError> {
        let Some(zone) = self.state.active_zone() else {
            return Ok(None);
        };
        let output = self.registry.resolve(zone)?;
        self.driver.set_output(output, false)?;
        self.state.commit(&Decision::DeEnergize(zone));
        Ok(Some(zone))
    }

    /// The output bound to the running zone.
    #[must_use]
    pub fn active_output(&self) -> Option<OutputHandle> {
        self.state
            .active_zone()
            .and_then(|zone| self.registry.resolve(zone).ok())
    }
}

/// Failures of [`ZoneController::handle`].
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("zone resolution failed")]
    Resolution(#[from] ResolutionError),

    #[error("output driver failed")]
    Output(#[from] OutputError),
}
