//! Error definitions shared across library modules.
//! Every failure here is local to the CAN bus feature: callers degrade to
//! "message dropped", "message deferred" or "feature disabled".
use crate::core::Direction;
use thiserror_no_std::Error;

//==================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised when handing a message to a ring buffer.
pub enum QueueError {
    /// No free slot left; the message was dropped.
    #[error("{direction:?} ring buffer is full")]
    Full { direction: Direction },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building a [`CanMessage`](crate::core::CanMessage).
pub enum MessageError {
    /// Classic CAN frames carry at most eight bytes.
    #[error("Payload too long: {len} bytes (max 8)")]
    PayloadTooLong { len: usize },
}

//==================================================================================STORAGE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures reported by the persisted-settings storage.
pub enum StorageError {
    /// The storage region could not be reserved or is not available.
    #[error("Settings storage unavailable")]
    Unavailable,
    /// Stored data failed its integrity check.
    #[error("Settings storage corrupt")]
    Corrupt,
    /// Read or write transfer failed.
    #[error("Settings storage transfer failed")]
    Transfer,
}

//==================================================================================SETTING_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors returned by the settings get/set/validate callbacks.
pub enum SettingError {
    /// The setting id is not owned by this plugin.
    #[error("Unknown setting {id}")]
    UnknownSetting { id: u16 },
    /// The value is not a valid choice index.
    #[error("Invalid value {value}")]
    InvalidValue { value: u16 },
}

//==================================================================================LIFECYCLE_ERROR
#[derive(Error, Debug)]
/// Errors raised while (re)starting the transceiver.
pub enum StartError<E: core::fmt::Debug> {
    /// The driver refused to start at the configured baud rate.
    #[error("CAN peripheral failed to start: {0:?}")]
    Driver(E),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that leave the whole plugin disabled.
pub enum InitError {
    /// Persisted-settings storage could not be reserved.
    #[error("Settings storage could not be reserved")]
    StorageUnavailable,
}
