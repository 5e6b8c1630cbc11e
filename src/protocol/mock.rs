//! Scriptable transceiver and storage doubles shared by the unit tests.
extern crate std;

use std::collections::VecDeque;
use std::vec::Vec;

use crate::core::CanMessage;
use crate::error::StorageError;
use crate::infra::traits::settings_store::SettingsStore;
use crate::infra::traits::transceiver::Transceiver;
use crate::protocol::baud::BaudRate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Busy;

#[derive(Default)]
pub(crate) struct MockTransceiver {
    pub fail_start: bool,
    pub starts: Vec<BaudRate>,
    pub stops: usize,
    /// Answers to successive `transmit` calls; accepts once exhausted.
    pub transmit_script: VecDeque<bool>,
    pub offered: Vec<u32>,
    pub sent: Vec<CanMessage>,
    pub rx_pending: bool,
    pub fetches: usize,
}

impl Transceiver for MockTransceiver {
    type Error = Busy;

    fn start(&mut self, baud: BaudRate) -> Result<(), Self::Error> {
        self.starts.push(baud);
        if self.fail_start {
            Err(Busy)
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn transmit(&mut self, message: &CanMessage) -> Result<(), Self::Error> {
        self.offered.push(message.id);
        if self.transmit_script.pop_front().unwrap_or(true) {
            self.sent.push(*message);
            Ok(())
        } else {
            Err(Busy)
        }
    }

    fn rx_pending(&mut self) -> bool {
        self.rx_pending
    }

    fn fetch(&mut self) {
        self.fetches += 1;
        self.rx_pending = false;
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub blob: Option<Vec<u8>>,
    pub refuse_reserve: bool,
    pub writes: usize,
}

impl SettingsStore for MemoryStore {
    fn reserve(&mut self, _len: usize) -> Result<(), StorageError> {
        if self.refuse_reserve {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
        match &self.blob {
            Some(blob) if blob.len() == buf.len() => {
                buf.copy_from_slice(blob);
                Ok(())
            }
            _ => Err(StorageError::Corrupt),
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), StorageError> {
        self.writes += 1;
        self.blob = Some(Vec::from(buf));
        Ok(())
    }
}
