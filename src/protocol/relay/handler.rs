//! Inbound handler chain: where drained RX messages go.
//!
//! Handlers are stacked with [`RxChain`]: the most recently added handler sees
//! a message first and forwards it to the previous one when it declines it.
//! The bottom of the default chain is [`LogRxHandler`], which accepts anything.
use crate::core::CanMessage;

/// Receiver of drained RX messages.
pub trait RxHandler {
    /// Handle `message`. Returns `true` when the message was claimed.
    ///
    /// The return value only steers the chain: the RX queue consumes the
    /// message either way.
    fn on_message(&mut self, message: &CanMessage) -> bool;
}

impl<F> RxHandler for F
where
    F: FnMut(&CanMessage) -> bool,
{
    fn on_message(&mut self, message: &CanMessage) -> bool {
        self(message)
    }
}

/// Default handler: logs the identifier and claims the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRxHandler;

impl RxHandler for LogRxHandler {
    fn on_message(&mut self, _message: &CanMessage) -> bool {
        #[cfg(feature = "defmt")]
        defmt::debug!("CAN message id:{:x}", _message.id);
        true
    }
}

/// `handler` in front of `previous`.
#[derive(Debug, Clone, Copy)]
pub struct RxChain<H, P> {
    handler: H,
    previous: P,
}

impl<H, P> RxChain<H, P> {
    pub fn new(handler: H, previous: P) -> Self {
        Self { handler, previous }
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn previous_mut(&mut self) -> &mut P {
        &mut self.previous
    }
}

impl<H: RxHandler, P: RxHandler> RxHandler for RxChain<H, P> {
    fn on_message(&mut self, message: &CanMessage) -> bool {
        self.handler.on_message(message) || self.previous.on_message(message)
    }
}
