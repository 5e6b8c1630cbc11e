//! Minimal abstraction for the CAN peripheral driver. Lets the relay sit on top
//! of any HAL (bxCAN, FDCAN, TWAI, MCP2515, a simulator, ...).
use crate::core::CanMessage;
use crate::protocol::baud::BaudRate;

/// Contract between the relay and the low-level transceiver driver.
///
/// Every method must return within bounded time: the relay calls them from the
/// host's real-time tick.
pub trait Transceiver {
    type Error: core::fmt::Debug;

    /// Bring the peripheral up at `baud`.
    fn start(&mut self, baud: BaudRate) -> Result<(), Self::Error>;

    /// Shut the peripheral down. Never fails.
    fn stop(&mut self);

    /// Hand one frame to the hardware. An error means "busy, try again later":
    /// the relay keeps the frame at the head of the TX queue.
    fn transmit(&mut self, message: &CanMessage) -> Result<(), Self::Error>;

    /// Whether received data is waiting for an explicit [`fetch`](Self::fetch).
    ///
    /// Drivers that push frames into the RX queue straight from their interrupt
    /// handler keep the default.
    fn rx_pending(&mut self) -> bool {
        false
    }

    /// Pull pending frames out of the peripheral and submit them to the RX
    /// queue (the driver owns the [`Inbound`](crate::protocol::queue::Inbound) port).
    fn fetch(&mut self) {}
}

impl<T: Transceiver + ?Sized> Transceiver for &mut T {
    type Error = T::Error;

    fn start(&mut self, baud: BaudRate) -> Result<(), Self::Error> {
        (**self).start(baud)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn transmit(&mut self, message: &CanMessage) -> Result<(), Self::Error> {
        (**self).transmit(message)
    }

    fn rx_pending(&mut self) -> bool {
        (**self).rx_pending()
    }

    fn fetch(&mut self) {
        (**self).fetch()
    }
}
