//! Supported bus speeds and the controller that (re)starts the transceiver
//! when the speed changes.
//!
//! The settings surface exposes the speed as a choice index:
//!
//! | index | bit rate  |
//! |-------|-----------|
//! | 0     | 125 000   |
//! | 1     | 250 000   |
//! | 2     | 500 000   |
//! | 3     | 1 000 000 |
pub mod controller;

pub use controller::{BaudChange, BaudController};

/// Default bus speed, also used when a stored value cannot be mapped.
pub const DEFAULT_BAUD_RATE: BaudRate = BaudRate::Kbps125;

/// Comma-separated labels of the radio-button setting, in index order.
pub const BAUD_CHOICES: &str = "125000,250000,500000,1000000";

/// Bit rates the relay can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BaudRate {
    Kbps125 = 0,
    Kbps250 = 1,
    Kbps500 = 2,
    Mbps1 = 3,
}

/// Outcome of mapping a raw bit rate to a choice index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudIndex {
    /// The rate is supported; this is its index.
    Exact(u8),
    /// The rate is not supported; the default index is returned instead.
    Fallback(u8),
}

impl BaudIndex {
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            BaudIndex::Exact(index) | BaudIndex::Fallback(index) => index,
        }
    }

    #[inline]
    pub fn used_fallback(self) -> bool {
        matches!(self, BaudIndex::Fallback(_))
    }

    /// Rate designated by the index.
    pub fn rate(self) -> BaudRate {
        BaudRate::from_index(self.index()).unwrap_or(DEFAULT_BAUD_RATE)
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        DEFAULT_BAUD_RATE
    }
}

impl BaudRate {
    /// All rates, in index order.
    pub const ALL: [BaudRate; 4] = [
        BaudRate::Kbps125,
        BaudRate::Kbps250,
        BaudRate::Kbps500,
        BaudRate::Mbps1,
    ];

    /// Bits per second.
    pub const fn bps(self) -> u32 {
        match self {
            BaudRate::Kbps125 => 125_000,
            BaudRate::Kbps250 => 250_000,
            BaudRate::Kbps500 => 500_000,
            BaudRate::Mbps1 => 1_000_000,
        }
    }

    /// Choice index.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Exact match only.
    pub fn from_bps(bps: u32) -> Option<Self> {
        match Self::lookup(bps) {
            BaudIndex::Exact(index) => Self::from_index(index),
            BaudIndex::Fallback(_) => None,
        }
    }

    /// Map a raw bit rate to its choice index, scanning from the highest index
    /// down. Unsupported rates yield [`BaudIndex::Fallback`] with the default
    /// index.
    pub fn lookup(bps: u32) -> BaudIndex {
        Self::ALL
            .iter()
            .rev()
            .find(|rate| rate.bps() == bps)
            .map(|rate| BaudIndex::Exact(rate.index()))
            .unwrap_or(BaudIndex::Fallback(DEFAULT_BAUD_RATE.index()))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
