//! Unit tests for the bit-rate table and the restart controller.
use super::*;
use crate::error::{SettingError, StartError};
use crate::protocol::mock::{Busy, MockTransceiver};
use crate::protocol::settings::CanbusSettings;

//==================================================================================BAUD_TABLE
#[test]
/// Every supported rate maps to an index that maps back to the same rate.
fn test_index_round_trip() {
    for bps in [125_000, 250_000, 500_000, 1_000_000] {
        let index = BaudRate::lookup(bps);
        assert!(!index.used_fallback());
        let rate = BaudRate::from_index(index.index()).expect("index in range");
        assert_eq!(rate.bps(), bps);
    }
}

#[test]
/// Index order matches the radio-button labels.
fn test_index_order_matches_choices() {
    let mut labels = BAUD_CHOICES.split(',');
    for rate in BaudRate::ALL {
        let label = labels.next().expect("one label per rate");
        assert_eq!(label.parse::<u32>(), Ok(rate.bps()));
    }
    assert!(labels.next().is_none());
}

#[test]
/// An unsupported rate falls back to the default index instead of failing.
fn test_unsupported_rate_falls_back() {
    let index = BaudRate::lookup(33_333);
    assert_eq!(index, BaudIndex::Fallback(0));
    assert_eq!(index.rate(), BaudRate::Kbps125);
    assert_eq!(BaudRate::from_bps(33_333), None);
}

#[test]
/// Indices past the table are refused.
fn test_from_index_out_of_range() {
    assert_eq!(BaudRate::from_index(4), None);
}

//==================================================================================CONTROLLER
#[test]
/// A successful start enables the bus at the configured rate.
fn test_start_enables() {
    let mut controller = BaudController::new(MockTransceiver::default(), CanbusSettings::default());
    assert!(!controller.is_enabled());

    assert!(controller.start().is_ok());
    assert!(controller.is_enabled());
    assert_eq!(controller.driver().starts, [BaudRate::Kbps125]);
}

#[test]
/// Changing speed stops then starts the driver at the new rate.
fn test_set_restarts_driver() {
    let mut controller = BaudController::new(MockTransceiver::default(), CanbusSettings::default());
    controller.start().expect("mock starts");

    let change = controller.set_index(2).expect("index 2 is valid");
    assert_eq!(change.rate, BaudRate::Kbps500);
    assert!(change.started.is_ok());
    assert_eq!(controller.driver().stops, 1);
    assert_eq!(
        controller.driver().starts,
        [BaudRate::Kbps125, BaudRate::Kbps500]
    );
    assert_eq!(controller.baud_rate(), BaudRate::Kbps500);
}

#[test]
/// A failed restart clears the enabled flag but keeps the requested rate.
fn test_failed_restart_keeps_requested_rate() {
    let mut controller = BaudController::new(MockTransceiver::default(), CanbusSettings::default());
    controller.start().expect("mock starts");
    controller.driver_mut().fail_start = true;

    let change = controller.set(BaudRate::Mbps1);
    assert!(matches!(change.started, Err(StartError::Driver(Busy))));
    assert!(!controller.is_enabled());
    assert_eq!(controller.baud_rate(), BaudRate::Mbps1);
}

#[test]
/// Out-of-range indices are rejected without touching the driver.
fn test_set_invalid_index() {
    let mut controller = BaudController::new(MockTransceiver::default(), CanbusSettings::default());
    let result = controller.set_index(7);
    assert!(matches!(
        result,
        Err(SettingError::InvalidValue { value: 7 })
    ));
    assert_eq!(controller.driver().stops, 0);
    assert!(controller.driver().starts.is_empty());
}
