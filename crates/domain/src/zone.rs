//! Zone identifiers, output handles and signal levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical irrigation zone number as known to the bridge.
///
/// Identifiers are not contiguous: a zone whose valve is broken is simply
/// left out of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(u16);

impl ZoneId {
    /// Wrap a raw zone number.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Access the raw zone number.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The label the bridge uses for this zone's switch (`Zone<N>`).
    #[must_use]
    pub fn bridge_label(self) -> String {
        format!("Zone{}", self.0)
    }
}

impl From<u16> for ZoneId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque handle to a physical digital output (a GPIO line on real boards).
///
/// Only output drivers interpret the inner number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputHandle(u32);

impl OutputHandle {
    /// Wrap a raw output number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Access the raw output number.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OutputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output#{}", self.0)
    }
}

/// Electrical level written to an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalLevel {
    /// Level 0.
    Low,
    /// Level 1.
    High,
}

impl SignalLevel {
    /// Map an energized flag to a level for active-low relay boards:
    /// energized drives the line low, de-energized drives it high.
    #[must_use]
    pub const fn active_low(energized: bool) -> Self {
        if energized { Self::Low } else { Self::High }
    }

    /// Whether this level energizes an active-low relay.
    #[must_use]
    pub const fn energizes_active_low(self) -> bool {
        matches!(self, Self::Low)
    }

    /// The numeric level (`0` or `1`).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_u8().fmt(f)
    }
}

/// One row of the zone table: a zone bound to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneEntry {
    pub zone_id: ZoneId,
    pub output: OutputHandle,
}

impl ZoneEntry {
    #[must_use]
    pub const fn new(zone_id: ZoneId, output: OutputHandle) -> Self {
        Self { zone_id, output }
    }
}
