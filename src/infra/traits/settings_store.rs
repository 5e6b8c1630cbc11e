//! Persisted-settings storage (EEPROM, flash emulation, FRAM...). The relay
//! stores a single small blob; integrity checking belongs to the store.
use crate::error::StorageError;

/// Non-volatile storage region owned by the plugin.
pub trait SettingsStore {
    /// Reserve `len` bytes. Called once at initialisation.
    fn reserve(&mut self, len: usize) -> Result<(), StorageError>;

    /// Fill `buf` with the stored blob.
    ///
    /// Returns [`StorageError::Corrupt`] when the blob is absent or fails its
    /// integrity check.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Persist `buf`.
    fn write(&mut self, buf: &[u8]) -> Result<(), StorageError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &mut T {
    fn reserve(&mut self, len: usize) -> Result<(), StorageError> {
        (**self).reserve(len)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), StorageError> {
        (**self).write(buf)
    }
}
