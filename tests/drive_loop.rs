//! The relay running as an async task instead of a host tick hook.
mod helpers;

use canbus_relay::infra::traits::host::DeferredCommand;
use canbus_relay::protocol::plugin::Canbus;
use canbus_relay::protocol::queue::BusQueues;
use canbus_relay::protocol::relay::LogRxHandler;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use helpers::{msg, MemoryStore, MockTimer, MockTransceiver, RecordingRegistry};
use tokio::time::{sleep, timeout, Duration};

#[tokio::test]
/// `drive` keeps draining the TX queue, one frame per millisecond.
async fn drive_transmits_queued_frames() {
    let deferred: Channel<NoopRawMutex, DeferredCommand, 1> = Channel::new();
    let driver = MockTransceiver::default();
    let mut queues = BusQueues::<8>::new();
    let mut parts = queues.split();

    let mut canbus = Canbus::init(
        driver.clone(),
        MemoryStore::default(),
        parts.drains,
        LogRxHandler,
        &mut RecordingRegistry::default(),
        &deferred,
    )
    .expect("storage available");
    let mut timer = MockTimer::new();

    let drive = canbus.drive(&mut timer);
    let feed = async {
        for id in 0..20u32 {
            while !parts.outbound.submit(msg(id)) {
                sleep(Duration::from_millis(1)).await;
            }
        }
        while driver.state.lock().unwrap().sent.len() < 20 {
            sleep(Duration::from_millis(1)).await;
        }
    };

    let finished = timeout(Duration::from_secs(5), async {
        tokio::select! {
            _ = drive => panic!("drive loop returned"),
            _ = feed => {}
        }
    })
    .await;

    assert!(finished.is_ok(), "frames not transmitted in time");
    assert!(driver.sent_ids().into_iter().eq(0..20));
}

#[tokio::test]
/// `drive_until` hands back the stop future's output once it completes.
async fn drive_until_stops_on_signal() {
    let deferred: Channel<NoopRawMutex, DeferredCommand, 1> = Channel::new();
    let driver = MockTransceiver::default();
    let mut queues = BusQueues::<8>::new();
    let mut parts = queues.split();

    let mut canbus = Canbus::init(
        driver.clone(),
        MemoryStore::default(),
        parts.drains,
        LogRxHandler,
        &mut RecordingRegistry::default(),
        &deferred,
    )
    .expect("storage available");
    let mut timer = MockTimer::new();

    for id in 0..3u32 {
        assert!(parts.outbound.submit(msg(0x500 + id)));
    }
    let stop = async {
        while driver.state.lock().unwrap().sent.len() < 3 {
            sleep(Duration::from_millis(1)).await;
        }
        "stopped"
    };

    let output = timeout(Duration::from_secs(5), canbus.drive_until(&mut timer, stop))
        .await
        .expect("relay stopped in time");
    assert_eq!(output, "stopped");
    assert_eq!(driver.sent_ids(), [0x500, 0x501, 0x502]);

    // The context is usable again once the task returned.
    assert_eq!(canbus.relay().tx_pending(), 0);
}
