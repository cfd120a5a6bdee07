//! # sprinkler-adapter-hal
//!
//! [`OutputDriver`] over `embedded-hal` digital output pins.
//!
//! Each zone output is bound to one [`OutputPin`]. Boards are active-low, so
//! construction drives every pin high before the controller can issue
//! commands.
//!
//! ## Dependency rule
//!
//! Depends on `sprinkler-app` (port traits) and `sprinkler-domain` only. The
//! concrete pin type comes from the board's HAL crate.

use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

use sprinkler_app::ports::OutputDriver;
use sprinkler_domain::error::OutputError;
use sprinkler_domain::zone::{OutputHandle, SignalLevel};

/// Errors raised by the pin driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HalError {
    /// The pin refused the write.
    #[error("pin write failed: {kind:?}")]
    Pin { kind: ErrorKind },

    /// No pin is bound to the output.
    #[error("no pin bound to output")]
    UnknownOutput,
}

/// Zone outputs backed by `embedded-hal` pins.
pub struct HalOutputs<P> {
    pins: Mutex<Vec<(OutputHandle, P)>>,
}

impl<P> HalOutputs<P>
where
    P: OutputPin + Send,
{
    /// Bind pins to outputs and drive them all high (de-energized).
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] for the first pin that could not be driven high.
    pub fn new(pins: impl IntoIterator<Item = (OutputHandle, P)>) -> Result<Self, OutputError> {
        let mut pins: Vec<(OutputHandle, P)> = pins.into_iter().collect();
        for (handle, pin) in &mut pins {
            write(pin, SignalLevel::High).map_err(|err| OutputError::new(*handle, err))?;
        }
        tracing::debug!(outputs = pins.len(), "pins initialised high");
        Ok(Self {
            pins: Mutex::new(pins),
        })
    }

    /// Release the pins, e.g. to hand them back to the board.
    pub fn into_pins(self) -> Vec<(OutputHandle, P)> {
        self.pins
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(OutputHandle, P)>> {
        self.pins.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write<P: OutputPin>(pin: &mut P, level: SignalLevel) -> Result<(), HalError> {
    let result = match level {
        SignalLevel::Low => pin.set_low(),
        SignalLevel::High => pin.set_high(),
    };
    result.map_err(|err| HalError::Pin { kind: err.kind() })
}

impl<P> OutputDriver for HalOutputs<P>
where
    P: OutputPin + Send,
{
    fn set_level(&self, handle: OutputHandle, level: SignalLevel) -> Result<(), OutputError> {
        let mut pins = self.lock();
        let pin = pins
            .iter_mut()
            .find(|(bound, _)| *bound == handle)
            .map(|(_, pin)| pin)
            .ok_or_else(|| OutputError::new(handle, HalError::UnknownOutput))?;
        write(pin, level).map_err(|err| OutputError::new(handle, err))?;
        tracing::trace!(%handle, %level, "pin written");
        Ok(())
    }
}
