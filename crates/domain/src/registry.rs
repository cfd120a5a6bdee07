//! Zone registry — the fixed zone → output table built at startup.

use crate::error::{RegistryError, ResolutionError};
use crate::zone::{OutputHandle, ZoneEntry, ZoneId};

/// Factory wiring as `(zone id, output pin)`. Zone 3 is not wired.
pub const DEFAULT_ZONE_TABLE: [(u16, u32); 8] = [
    (1, 27),
    (2, 26),
    (4, 25),
    (5, 33),
    (6, 32),
    (7, 18),
    (8, 19),
    (9, 21),
];

/// Immutable mapping from [`ZoneId`] to [`OutputHandle`].
///
/// The table is small and fixed, so lookups scan it linearly.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    entries: Vec<ZoneEntry>,
}

impl ZoneRegistry {
    /// Build the registry from a zone table.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the table is empty, or a zone id or an
    /// output appears twice.
    pub fn new(entries: impl IntoIterator<Item = ZoneEntry>) -> Result<Self, RegistryError> {
        let mut table: Vec<ZoneEntry> = Vec::new();
        for entry in entries {
            if table.iter().any(|e| e.zone_id == entry.zone_id) {
                return Err(RegistryError::DuplicateZone(entry.zone_id));
            }
            if table.iter().any(|e| e.output == entry.output) {
                return Err(RegistryError::DuplicateOutput(entry.output));
            }
            table.push(entry);
        }
        if table.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { entries: table })
    }

    /// Resolve a zone to its output.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownZone`] when the zone is not in the table.
    pub fn resolve(&self, zone_id: ZoneId) -> Result<OutputHandle, ResolutionError> {
        self.entries
            .iter()
            .find(|e| e.zone_id == zone_id)
            .map(|e| e.output)
            .ok_or(ResolutionError::UnknownZone(zone_id))
    }

    /// Registered zone ids, in table order.
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.entries.iter().map(|e| e.zone_id)
    }

    /// Registered outputs, in table order.
    pub fn outputs(&self) -> impl Iterator<Item = OutputHandle> + '_ {
        self.entries.iter().map(|e| e.output)
    }

    #[must_use]
    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
