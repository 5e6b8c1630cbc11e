//! Drain/dispatch step run from the host's real-time tick.
//!
//! Each call:
//!
//! 1. lets the driver service a pending receive (`rx_pending` / `fetch`);
//! 2. returns early if this millisecond was already processed;
//! 3. offers at most one TX message to the transceiver (kept on rejection);
//! 4. hands at most one RX message to the inbound handler chain;
//! 5. records the millisecond as processed.
//!
//! At most one message per direction per millisecond.
pub mod handler;

pub use handler::{LogRxHandler, RxChain, RxHandler};

use embassy_time::Instant;

use crate::core::{CANBUS_BUFFER_LEN, POLL_INTERVAL_MS};
use crate::infra::traits::transceiver::Transceiver;
use crate::protocol::queue::{Drain, Drains};

/// What a call to [`Relay::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Same millisecond as the previous pass; queues untouched.
    RateLimited,
    /// One drain attempt per direction.
    Drained { tx: Drain, rx: Drain },
}

/// Consumer side of both queues plus the inbound handler chain.
pub struct Relay<'a, H = LogRxHandler, const N: usize = CANBUS_BUFFER_LEN> {
    drains: Drains<'a, N>,
    rx_handler: H,
    last_tick: Option<u64>,
}

impl<'a, H: RxHandler, const N: usize> Relay<'a, H, N> {
    pub fn new(drains: Drains<'a, N>, rx_handler: H) -> Self {
        Self {
            drains,
            rx_handler,
            last_tick: None,
        }
    }

    /// Run one drain/dispatch pass at time `now`.
    pub fn poll<D: Transceiver>(&mut self, driver: &mut D, now: Instant) -> PollOutcome {
        // The driver may flag received data instead of queueing it itself.
        if driver.rx_pending() {
            driver.fetch();
        }

        let tick = now.as_millis() / POLL_INTERVAL_MS;
        if self.last_tick == Some(tick) {
            return PollOutcome::RateLimited;
        }

        let tx = if self.drains.tx.is_empty() {
            Drain::Empty
        } else {
            self.drains
                .tx
                .drain_one(|message| driver.transmit(message).is_ok())
        };

        let rx = if self.drains.rx.is_empty() {
            Drain::Empty
        } else {
            let handler = &mut self.rx_handler;
            self.drains
                .rx
                .drain_one(|message| handler.on_message(message))
        };

        self.last_tick = Some(tick);
        PollOutcome::Drained { tx, rx }
    }

    /// Put `handler` in front of the current inbound chain.
    pub fn chain_rx_handler<G: RxHandler>(self, handler: G) -> Relay<'a, RxChain<G, H>, N> {
        Relay {
            drains: self.drains,
            rx_handler: RxChain::new(handler, self.rx_handler),
            last_tick: self.last_tick,
        }
    }

    pub fn rx_handler_mut(&mut self) -> &mut H {
        &mut self.rx_handler
    }

    /// Messages waiting in the TX queue.
    pub fn tx_pending(&self) -> usize {
        self.drains.tx.len()
    }

    /// Messages waiting in the RX queue.
    pub fn rx_pending(&self) -> usize {
        self.drains.rx.len()
    }
}
