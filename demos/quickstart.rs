//! # Quickstart Example
//!
//! Minimal walkthrough of canbus-relay:
//! - Split the TX/RX queues and install the plugin
//! - Queue frames from "interrupt" and application side
//! - Drive the relay from a simulated real-time tick
//! - Change the baud rate through the settings callbacks
//!
//! This example uses `std` and a console transceiver for a quick trial run.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use canbus_relay::core::CanMessage;
use canbus_relay::error::StorageError;
use canbus_relay::infra::traits::host::{DeferredCommand, SettingsRegistry};
use canbus_relay::infra::traits::settings_store::SettingsStore;
use canbus_relay::infra::traits::transceiver::Transceiver;
use canbus_relay::protocol::baud::BaudRate;
use canbus_relay::protocol::plugin::hooks::{ChainExt, HostHooks};
use canbus_relay::protocol::plugin::Canbus;
use canbus_relay::protocol::queue::BusQueues;
use canbus_relay::protocol::settings::{SettingDetails, CANBUS_BAUD_RATE_SETTING};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Instant;

/// Transceiver printing every frame it is asked to send.
struct ConsoleTransceiver;

impl Transceiver for ConsoleTransceiver {
    type Error = ();

    fn start(&mut self, baud: BaudRate) -> Result<(), Self::Error> {
        println!("   [driver] start at {} bit/s", baud.bps());
        Ok(())
    }

    fn stop(&mut self) {
        println!("   [driver] stop");
    }

    fn transmit(&mut self, message: &CanMessage) -> Result<(), Self::Error> {
        println!("   [driver] TX id=0x{:03X} data={:02X?}", message.id, message.payload());
        Ok(())
    }
}

/// Non-volatile storage simulated in RAM.
#[derive(Default)]
struct RamStore {
    blob: Option<Vec<u8>>,
}

impl SettingsStore for RamStore {
    fn reserve(&mut self, _len: usize) -> Result<(), StorageError> {
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
        let blob = self.blob.as_ref().ok_or(StorageError::Corrupt)?;
        buf.copy_from_slice(blob);
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), StorageError> {
        self.blob = Some(buf.to_vec());
        Ok(())
    }
}

struct PrintRegistry;

impl SettingsRegistry for PrintRegistry {
    fn register(&mut self, details: &'static SettingDetails) {
        for setting in details.settings {
            println!(
                "   [host] setting ${} \"{}\" choices {}",
                setting.id, setting.name, setting.choices
            );
        }
    }
}

fn main() {
    println!("=== canbus-relay Quickstart ===\n");

    // ======================================================================
    // 1. Queues and plugin installation
    // ======================================================================
    println!("1. Installing the plugin");

    let mut queues = BusQueues::<8>::new();
    let mut parts = queues.split();
    let deferred: Channel<NoopRawMutex, DeferredCommand, 2> = Channel::new();

    let canbus = match Canbus::init(
        ConsoleTransceiver,
        RamStore::default(),
        parts.drains,
        |message: &CanMessage| {
            println!("   [app] RX id=0x{:03X} data={:02X?}", message.id, message.payload());
            true
        },
        &mut PrintRegistry,
        &deferred,
    ) {
        Ok(canbus) => canbus,
        Err(err) => {
            println!("   init failed: {err}");
            return;
        }
    };
    println!("   running at {} bit/s\n", canbus.baud_rate().bps());

    let mut hooks = ().chain(canbus);

    // ======================================================================
    // 2. Queue traffic in both directions
    // ======================================================================
    println!("2. Queueing frames");

    for id in 0x100..0x103 {
        let frame = CanMessage::new(id, &[0xAA, id as u8]).unwrap_or(CanMessage::EMPTY);
        parts.outbound.submit(frame);
    }
    // What a receive interrupt would push.
    let incoming = CanMessage::new(0x7E8, &[0x02, 0x41, 0x0C]).unwrap_or(CanMessage::EMPTY);
    parts.inbound.submit(incoming);
    println!("   TX pending: {}, RX pending: {}\n", parts.outbound.pending(), parts.inbound.pending());

    // ======================================================================
    // 3. Real-time ticks
    // ======================================================================
    println!("3. Ticking the real-time hook");

    for ms in 0..4 {
        println!("  tick {ms} ms");
        hooks.on_execute_realtime(Instant::from_millis(ms));
        // A second call in the same millisecond is a no-op.
        hooks.on_execute_realtime(Instant::from_millis(ms));
    }
    println!();

    // ======================================================================
    // 4. Settings
    // ======================================================================
    println!("4. Switching to 500 kbit/s");

    let canbus = hooks.hook_mut();
    match canbus.setting_set(CANBUS_BAUD_RATE_SETTING, 2) {
        Ok(change) => println!("   now at {} bit/s, started: {}", change.rate.bps(), change.started.is_ok()),
        Err(err) => println!("   rejected: {err}"),
    }
    if let Err(err) = canbus.settings_save() {
        println!("   save failed: {err}");
    }
    println!("   stored blob: {:?}", canbus.store().blob);

    let mut report = String::new();
    let _ = hooks.on_report_options(false, &mut report);
    print!("\n5. Option report\n   {report}");

    println!("\n✅ Quickstart complete!");
}
