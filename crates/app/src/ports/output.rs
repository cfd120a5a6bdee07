//! Output driver port — the digital outputs wired to the zone relays.

use sprinkler_domain::error::OutputError;
use sprinkler_domain::zone::{OutputHandle, SignalLevel};

/// Sets physical outputs to a signal level.
///
/// Implementations must honour the level exactly: the relay boards are
/// active-low, so [`SignalLevel::Low`] opens a valve.
pub trait OutputDriver: Send + Sync {
    /// Drive `handle` to `level`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if the output is unknown to the driver or the
    /// hardware refused the write.
    fn set_level(&self, handle: OutputHandle, level: SignalLevel) -> Result<(), OutputError>;

    /// Energize or de-energize `handle` using the active-low mapping.
    ///
    /// # Errors
    ///
    /// Propagates [`set_level`](Self::set_level) failures.
    fn set_output(&self, handle: OutputHandle, energized: bool) -> Result<(), OutputError> {
        self.set_level(handle, SignalLevel::active_low(energized))
    }
}

impl<T: OutputDriver> OutputDriver for std::sync::Arc<T> {
    fn set_level(&self, handle: OutputHandle, level: SignalLevel) -> Result<(), OutputError> {
        (**self).set_level(handle, level)
    }
}
