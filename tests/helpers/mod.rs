/// Test doubles simulating the transceiver, the settings store, the host
/// registry and the timer during integration tests.
use canbus_relay::{
    core::CanMessage,
    error::StorageError,
    infra::traits::{
        host::SettingsRegistry, relay_timer::RelayTimer, settings_store::SettingsStore,
        transceiver::Transceiver,
    },
    protocol::{baud::BaudRate, queue::Inbound, settings::SettingDetails},
};
use embassy_time::Instant;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Busy;

#[derive(Default)]
#[allow(dead_code)]
/// Observable state of a [`MockTransceiver`].
pub struct DriverState {
    pub fail_start: bool,
    pub starts: Vec<BaudRate>,
    pub stops: usize,
    pub transmit_script: VecDeque<bool>,
    pub offered: Vec<u32>,
    pub sent: Vec<CanMessage>,
}

#[derive(Clone, Default)]
/// Transceiver whose state stays inspectable after it moved into the plugin.
pub struct MockTransceiver {
    pub state: Arc<Mutex<DriverState>>,
}

#[allow(dead_code)]
impl MockTransceiver {
    pub fn sent_ids(&self) -> Vec<u32> {
        self.state.lock().unwrap().sent.iter().map(|m| m.id).collect()
    }
}

impl Transceiver for MockTransceiver {
    type Error = Busy;

    fn start(&mut self, baud: BaudRate) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.starts.push(baud);
        if state.fail_start {
            Err(Busy)
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) {
        self.state.lock().unwrap().stops += 1;
    }

    fn transmit(&mut self, message: &CanMessage) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.offered.push(message.id);
        if state.transmit_script.pop_front().unwrap_or(true) {
            state.sent.push(*message);
            Ok(())
        } else {
            Err(Busy)
        }
    }
}

#[allow(dead_code)]
/// Polled-mode driver: frames wait in the "peripheral" until `fetch` moves
/// them into the RX queue through the inbound port it owns.
pub struct PolledDriver<'a> {
    pub inbound: Inbound<'a, 8>,
    pub peripheral: VecDeque<CanMessage>,
    pub fetches: usize,
}

impl Transceiver for PolledDriver<'_> {
    type Error = Busy;

    fn start(&mut self, _baud: BaudRate) -> Result<(), Self::Error> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn transmit(&mut self, _message: &CanMessage) -> Result<(), Self::Error> {
        Ok(())
    }

    fn rx_pending(&mut self) -> bool {
        !self.peripheral.is_empty()
    }

    fn fetch(&mut self) {
        self.fetches += 1;
        while let Some(message) = self.peripheral.pop_front() {
            if !self.inbound.submit(message) {
                self.peripheral.push_front(message);
                break;
            }
        }
    }
}

#[derive(Default)]
#[allow(dead_code)]
/// Settings store backed by a byte vector.
pub struct MemoryStore {
    pub blob: Option<Vec<u8>>,
    pub refuse_reserve: bool,
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
        self.blob = Some(buf.to_vec());
        Ok(())
    }
}

#[derive(Default)]
#[allow(dead_code)]
/// Host settings table recording what was registered.
pub struct RecordingRegistry {
    pub registered: Vec<&'static SettingDetails>,
}

impl SettingsRegistry for RecordingRegistry {
    fn register(&mut self, details: &'static SettingDetails) {
        self.registered.push(details);
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time` to drive the relay task in tests.
pub struct MockTimer {
    origin: tokio::time::Instant,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl RelayTimer for MockTimer {
    fn now(&mut self) -> Instant {
        Instant::from_millis(self.origin.elapsed().as_millis() as u64)
    }

    async fn delay_ms(&mut self, millis: u64) {
        sleep(Duration::from_millis(millis)).await;
    }
}

#[allow(dead_code)]
pub fn msg(id: u32) -> CanMessage {
    CanMessage::new(id, &id.to_le_bytes()).expect("four bytes fit in a frame")
}
