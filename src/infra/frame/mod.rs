//! Interop with [`embedded_can::Frame`]: HAL drivers usually speak their own
//! frame type, the relay queues [`CanMessage`] values.
//!
//! The identifier format travels with the message (`CanMessage::extended`), so
//! an extended frame with a low id is never put back on the bus as standard.
use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::core::{CanMessage, MAX_STANDARD_ID};
use crate::error::MessageError;

/// Mask of the 29 identifier bits of an extended frame.
const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

/// Raw value of an `embedded-can` identifier.
#[inline]
pub fn raw_id(id: Id) -> u32 {
    match id {
        Id::Standard(id) => id.as_raw() as u32,
        Id::Extended(id) => id.as_raw(),
    }
}

impl CanMessage {
    /// Build a message from an `embedded-can` identifier, keeping its format.
    pub fn with_id(id: Id, payload: &[u8]) -> Result<Self, MessageError> {
        match id {
            Id::Standard(_) => Self::new(raw_id(id), payload),
            Id::Extended(_) => Self::new_extended(raw_id(id), payload),
        }
    }

    /// Copy any `embedded-can` data frame into a relay message.
    pub fn from_frame<F: Frame>(frame: &F) -> Result<Self, MessageError> {
        Self::with_id(frame.id(), frame.data())
    }
}

impl Frame for CanMessage {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        CanMessage::with_id(id.into(), data).ok()
    }

    /// Remote frames are not relayed.
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        self.extended || self.id > MAX_STANDARD_ID
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        if !self.extended {
            if let Some(id) = u16::try_from(self.id).ok().and_then(StandardId::new) {
                return Id::Standard(id);
            }
        }
        ExtendedId::new(self.id & EXTENDED_ID_MASK)
            .map(Id::Extended)
            .unwrap_or(Id::Extended(ExtendedId::MAX))
    }

    fn dlc(&self) -> usize {
        self.payload().len()
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
