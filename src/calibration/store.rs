//! Calibration record storage.
//!
//! The store is a capability passed into every operation that touches
//! calibration. Updates are whole-record replacements keyed by channel,
//! never in-place field mutation, which keeps concurrent-access
//! reasoning per channel trivial. A missing record is not an error; it
//! resolves to the default identity-like record.

use super::record::CalibrationRecord;
use crate::sensing::ChannelId;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from a persistence backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("calibration store backend failed: {0}")]
    Backend(String),
}

/// Capability for loading and saving per-channel calibration.
///
/// Implementations own the encoding; the core only defines the logical
/// record. `save` replaces the channel's record atomically.
pub trait CalibrationStore {
    /// Loads the record for a channel, if one exists.
    fn load(&self, channel: ChannelId) -> Option<CalibrationRecord>;

    /// Replaces the record for a channel.
    fn save(&mut self, channel: ChannelId, record: CalibrationRecord) -> Result<(), StoreError>;

    /// Loads the record for a channel, substituting the default when
    /// absent and clamping fields from untrusted backends into band.
    fn load_or_default(&self, channel: ChannelId) -> CalibrationRecord {
        self.load(channel)
            .map(|rec| rec.clamped())
            .unwrap_or_default()
    }
}

/// In-memory store keyed by channel id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<ChannelId, CalibrationRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Channels with a stored record, in arbitrary order.
    pub fn channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.records.keys().copied()
    }
}

impl CalibrationStore for MemoryStore {
    fn load(&self, channel: ChannelId) -> Option<CalibrationRecord> {
        self.records.get(&channel).cloned()
    }

    fn save(&mut self, channel: ChannelId, record: CalibrationRecord) -> Result<(), StoreError> {
        self.records.insert(channel, record);
        Ok(())
    }
}
