//! Persisted plugin settings: a single bus speed stored as a little-endian
//! `u32` bit rate.
//!
//! Loading never fails from the caller's point of view: an unreadable blob or
//! an unsupported stored rate is replaced by the default configuration, which
//! is written back. The outcome says which path was taken.
pub mod descriptor;

pub use descriptor::{
    validate, GroupId, SettingDetail, SettingDetails, SettingFormat, SettingGroup,
    CANBUS_BAUD_RATE_SETTING, CANBUS_SETTING_DETAILS,
};

use crate::error::StorageError;
use crate::infra::traits::settings_store::SettingsStore;
use crate::protocol::baud::{BaudRate, DEFAULT_BAUD_RATE};

/// Size of the persisted blob.
pub const SETTINGS_BLOB_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanbusSettings {
    pub baud_rate: BaudRate,
}

impl Default for CanbusSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl CanbusSettings {
    pub fn to_bytes(&self) -> [u8; SETTINGS_BLOB_LEN] {
        self.baud_rate.bps().to_le_bytes()
    }

    /// Decode a stored blob. An unsupported rate is returned as `Err(raw)`.
    pub fn from_bytes(bytes: [u8; SETTINGS_BLOB_LEN]) -> Result<Self, u32> {
        let raw = u32::from_le_bytes(bytes);
        BaudRate::from_bps(raw)
            .map(|baud_rate| Self { baud_rate })
            .ok_or(raw)
    }
}

//==================================================================================LOAD_OUTCOME
/// Why the defaults were restored during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RestoreReason {
    /// The store could not provide a valid blob.
    Storage(StorageError),
    /// The blob was readable but held a rate the relay does not support.
    UnsupportedRate(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// Stored settings were used as is.
    Loaded,
    /// Defaults were used; `persisted` tells whether writing them back worked.
    Restored {
        reason: RestoreReason,
        persisted: bool,
    },
}

impl LoadOutcome {
    #[inline]
    pub fn used_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Restored { .. })
    }
}

//==================================================================================OPERATIONS
/// Read the settings from `store`, restoring the defaults if needed.
pub fn load<S: SettingsStore>(store: &mut S) -> (CanbusSettings, LoadOutcome) {
    #[cfg(feature = "defmt")]
    defmt::info!("canbus settings load");

    let mut blob = [0u8; SETTINGS_BLOB_LEN];
    let reason = match store.read(&mut blob) {
        Ok(()) => match CanbusSettings::from_bytes(blob) {
            Ok(settings) => return (settings, LoadOutcome::Loaded),
            Err(raw) => RestoreReason::UnsupportedRate(raw),
        },
        Err(err) => RestoreReason::Storage(err),
    };

    #[cfg(feature = "defmt")]
    defmt::warn!("canbus settings invalid ({}), restoring defaults", reason);

    let (settings, written) = restore(store);
    (
        settings,
        LoadOutcome::Restored {
            reason,
            persisted: written.is_ok(),
        },
    )
}

/// Write the default settings to `store` and return them with the write result.
pub fn restore<S: SettingsStore>(store: &mut S) -> (CanbusSettings, Result<(), StorageError>) {
    #[cfg(feature = "defmt")]
    defmt::info!("canbus settings restore");

    let settings = CanbusSettings::default();
    let written = save(store, &settings);
    (settings, written)
}

pub fn save<S: SettingsStore>(store: &mut S, settings: &CanbusSettings) -> Result<(), StorageError> {
    #[cfg(feature = "defmt")]
    defmt::info!("canbus settings save");

    store.write(&settings.to_bytes())
}
