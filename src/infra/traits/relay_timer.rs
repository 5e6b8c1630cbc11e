//! Asynchronous timer abstraction used by [`Canbus::drive`](crate::protocol::plugin::Canbus::drive)
//! when the relay runs as an executor task instead of a host tick hook.
use embassy_time::Instant;

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait RelayTimer {
    /// Current monotonic time.
    fn now(&mut self) -> Instant;

    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u64) -> impl core::future::Future<Output = ()> + 'a;
}
