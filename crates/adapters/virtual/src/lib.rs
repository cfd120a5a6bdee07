//! # sprinkler-adapter-virtual
//!
//! Virtual output driver that simulates the zone relay board.
//!
//! Every output starts de-energized (level 1, the active-low idle level).
//! Each write is kept in a history so tests and demos can check exactly which
//! levels reached the "hardware".
//!
//! ## Dependency rule
//!
//! Depends on `sprinkler-app` (port traits) and `sprinkler-domain` only.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sprinkler_app::ports::OutputDriver;
use sprinkler_domain::error::OutputError;
use sprinkler_domain::zone::{OutputHandle, SignalLevel};

/// Write to an output the virtual board was not built with.
#[derive(Debug, thiserror::Error)]
#[error("output is not wired on the virtual board")]
pub struct UnwiredOutput;

#[derive(Default)]
struct Board {
    levels: HashMap<OutputHandle, SignalLevel>,
    history: Vec<(OutputHandle, SignalLevel)>,
}

/// Simulated relay board.
pub struct VirtualOutputs {
    board: Mutex<Board>,
}

impl VirtualOutputs {
    /// Build a board with the given outputs, all driven high (de-energized).
    pub fn new(outputs: impl IntoIterator<Item = OutputHandle>) -> Self {
        let levels = outputs
            .into_iter()
            .map(|handle| (handle, SignalLevel::High))
            .collect();
        Self {
            board: Mutex::new(Board {
                levels,
                history: Vec::new(),
            }),
        }
    }

    /// Current level of `handle`, if it is wired.
    #[must_use]
    pub fn level(&self, handle: OutputHandle) -> Option<SignalLevel> {
        self.lock().levels.get(&handle).copied()
    }

    /// Outputs currently energized (driven low), sorted.
    #[must_use]
    pub fn energized(&self) -> Vec<OutputHandle> {
        let mut on: Vec<OutputHandle> = self
            .lock()
            .levels
            .iter()
            .filter(|(_, level)| level.energizes_active_low())
            .map(|(handle, _)| *handle)
            .collect();
        on.sort_unstable();
        on
    }

    /// Every write, in order.
    #[must_use]
    pub fn history(&self) -> Vec<(OutputHandle, SignalLevel)> {
        self.lock().history.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputDriver for VirtualOutputs {
    fn set_level(&self, handle: OutputHandle, level: SignalLevel) -> Result<(), OutputError> {
        let mut board = self.lock();
        let Some(current) = board.levels.get_mut(&handle) else {
            return Err(OutputError::new(handle, UnwiredOutput));
        };
        *current = level;
        board.history.push((handle, level));
        tracing::debug!(%handle, %level, "virtual output written");
        Ok(())
    }
}
