//! Direction queues: a TX and an RX [`RingBuffer`] split into the four
//! halves the relay hands out (two submission ports, two drains).
//!
//! Firmware places a [`BusQueues`] in a `static` (e.g. a `StaticCell`) and
//! calls [`BusQueues::split`] once. The ports go to the producers (outbound API
//! caller, inbound driver callback), the drains to the relay.
pub mod ring_buffer;

pub use ring_buffer::{Consumer, Drain, Producer, RingBuffer};

use crate::core::{CanMessage, Direction, CANBUS_BUFFER_LEN};
use crate::error::QueueError;

/// The pair of direction queues of one bus.
pub struct BusQueues<const N: usize = CANBUS_BUFFER_LEN> {
    tx: RingBuffer<N>,
    rx: RingBuffer<N>,
}

impl<const N: usize> Default for BusQueues<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BusQueues<N> {
    pub const fn new() -> Self {
        Self {
            tx: RingBuffer::new(Direction::Tx),
            rx: RingBuffer::new(Direction::Rx),
        }
    }

    /// Split into submission ports and drains. Borrowing `self` mutably
    /// guarantees a single producer and a single consumer per queue.
    pub fn split(&mut self) -> QueueParts<'_, N> {
        let (tx_producer, tx_consumer) = self.tx.split();
        let (rx_producer, rx_consumer) = self.rx.split();
        QueueParts {
            outbound: Outbound(tx_producer),
            inbound: Inbound(rx_producer),
            drains: Drains {
                tx: tx_consumer,
                rx: rx_consumer,
            },
        }
    }
}

/// Bundle returned by [`BusQueues::split`].
pub struct QueueParts<'a, const N: usize> {
    pub outbound: Outbound<'a, N>,
    pub inbound: Inbound<'a, N>,
    pub drains: Drains<'a, N>,
}

/// Consumer halves, owned by the relay. Only [`BusQueues::split`] builds one,
/// so the TX half always drains the TX queue.
pub struct Drains<'a, const N: usize> {
    pub(crate) tx: Consumer<'a, N>,
    pub(crate) rx: Consumer<'a, N>,
}

/// Firmware-side port: queue a frame for transmission.
pub struct Outbound<'a, const N: usize>(Producer<'a, N>);

impl<'a, const N: usize> Outbound<'a, N> {
    /// Queue `message` for transmission. `false` means the TX queue was full
    /// and the message was dropped.
    pub fn submit(&mut self, message: CanMessage) -> bool {
        self.0.enqueue(message).is_ok()
    }

    /// Like [`submit`](Self::submit), reporting which queue was full.
    pub fn try_submit(&mut self, message: CanMessage) -> Result<(), QueueError> {
        self.0.enqueue(message)
    }

    /// Messages waiting for the transceiver.
    pub fn pending(&self) -> usize {
        self.0.len()
    }

    /// Messages dropped because the TX queue was full.
    pub fn dropped(&self) -> usize {
        self.0.dropped()
    }
}

/// Driver-side port: hand over a received frame. Callable from interrupt context.
pub struct Inbound<'a, const N: usize>(Producer<'a, N>);

impl<'a, const N: usize> Inbound<'a, N> {
    /// Queue a received `message`. `false` means the RX queue was full and the
    /// message was dropped.
    pub fn submit(&mut self, message: CanMessage) -> bool {
        self.0.enqueue(message).is_ok()
    }

    /// Like [`submit`](Self::submit), reporting which queue was full.
    pub fn try_submit(&mut self, message: CanMessage) -> Result<(), QueueError> {
        self.0.enqueue(message)
    }

    /// Messages waiting for the handler chain.
    pub fn pending(&self) -> usize {
        self.0.len()
    }

    /// Messages dropped because the RX queue was full.
    pub fn dropped(&self) -> usize {
        self.0.dropped()
    }
}
