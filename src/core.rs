//! Data types shared by the queues, the drain step and the driver boundary.
//!
//! A [`CanMessage`] is a plain value: it is copied into a ring buffer slot by
//! the producer and copied back out by the consumer, never borrowed across
//! the two sides.
use crate::error::MessageError;

/// Number of slots in each direction queue. One slot always stays unused, so
/// a queue holds at most `CANBUS_BUFFER_LEN - 1` messages.
pub const CANBUS_BUFFER_LEN: usize = 8;

/// Highest 11-bit (standard) identifier.
pub const MAX_STANDARD_ID: u32 = 0x7FF;

/// Classic CAN payload limit.
pub const MAX_DATA_LEN: usize = 8;

/// Minimum time between two drain passes, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 1;

/// Queue direction. Fixed when a ring buffer is built; selects the drain policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Received from the bus, delivered to the inbound handler chain.
    Rx,
    /// Queued by firmware, handed to the transceiver for transmission.
    Tx,
}

impl Direction {
    /// Short label used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Rx => "RX",
            Direction::Tx => "TX",
        }
    }
}

/// A CAN frame as stored in the relay queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanMessage {
    /// Raw identifier (11-bit standard or 29-bit extended, right aligned).
    pub id: u32,
    /// 29-bit identifier format. Standard and extended frames with the same
    /// numeric id are different frames on the wire.
    pub extended: bool,
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: u8,
    /// Payload buffer; bytes past `len` are ignored.
    pub data: [u8; MAX_DATA_LEN],
}

impl Default for CanMessage {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl CanMessage {
    /// Zero-length message with identifier 0, used to pre-fill queue slots.
    pub const EMPTY: Self = Self {
        id: 0,
        extended: false,
        len: 0,
        data: [0; MAX_DATA_LEN],
    };

    /// Build a message from an identifier and up to eight payload bytes.
    ///
    /// The format follows the value: identifiers above [`MAX_STANDARD_ID`] are
    /// extended. Use [`CanMessage::new_extended`] for a low extended id.
    pub fn new(id: u32, payload: &[u8]) -> Result<Self, MessageError> {
        Self::with_format(id, id > MAX_STANDARD_ID, payload)
    }

    /// Build a message with a 29-bit identifier, whatever its value.
    pub fn new_extended(id: u32, payload: &[u8]) -> Result<Self, MessageError> {
        Self::with_format(id, true, payload)
    }

    fn with_format(id: u32, extended: bool, payload: &[u8]) -> Result<Self, MessageError> {
        if payload.len() > MAX_DATA_LEN {
            return Err(MessageError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0; MAX_DATA_LEN];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            extended,
            len: payload.len() as u8,
            data,
        })
    }

    /// Populated payload bytes. A `len` above eight is clamped.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..(self.len as usize).min(MAX_DATA_LEN)]
    }
}
