//! Host notification chain: real-time tick and option report.
//!
//! Plugins are composed by value. Installing a plugin wraps whatever the host
//! had installed before ([`Chained`]), and the wrapper always runs the previous
//! hook first, so installing a plugin can never silently drop another.
//!
//! ```rust,ignore
//! let hooks = ().chain(spindle_plugin).chain(canbus);
//! hooks.on_execute_realtime(now); // spindle first, then the CAN relay
//! ```
use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embassy_time::Instant;

/// Callbacks the host invokes on every installed plugin.
pub trait HostHooks {
    /// Real-time tick, called at high frequency from the main loop.
    fn on_execute_realtime(&mut self, _now: Instant) {}

    /// Option report. `newopt` is set for the short "new options" report.
    fn on_report_options(&mut self, _newopt: bool, _out: &mut dyn fmt::Write) -> fmt::Result {
        Ok(())
    }
}

/// Empty chain: what the host starts with.
impl HostHooks for () {}

impl<T: HostHooks + ?Sized> HostHooks for &mut T {
    fn on_execute_realtime(&mut self, now: Instant) {
        (**self).on_execute_realtime(now)
    }

    fn on_report_options(&mut self, newopt: bool, out: &mut dyn fmt::Write) -> fmt::Result {
        (**self).on_report_options(newopt, out)
    }
}

/// Context shared with interrupt-level code through a blocking mutex. A
/// re-entrant call while the context is borrowed is skipped and logged.
impl<'m, M: RawMutex, T: HostHooks> HostHooks for &'m Mutex<M, RefCell<T>> {
    fn on_execute_realtime(&mut self, now: Instant) {
        self.lock(|cell| match cell.try_borrow_mut() {
            Ok(mut inner) => inner.on_execute_realtime(now),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("shared context busy, real-time tick skipped");
            }
        })
    }

    fn on_report_options(&mut self, newopt: bool, out: &mut dyn fmt::Write) -> fmt::Result {
        self.lock(|cell| match cell.try_borrow_mut() {
            Ok(mut inner) => inner.on_report_options(newopt, out),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("shared context busy, option report skipped");
                Ok(())
            }
        })
    }
}

/// `hook` installed on top of `previous`.
#[derive(Debug)]
pub struct Chained<P, H> {
    previous: P,
    hook: H,
}

impl<P, H> Chained<P, H> {
    pub fn new(previous: P, hook: H) -> Self {
        Self { previous, hook }
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    pub fn previous_mut(&mut self) -> &mut P {
        &mut self.previous
    }

    pub fn into_parts(self) -> (P, H) {
        (self.previous, self.hook)
    }
}

impl<P: HostHooks, H: HostHooks> HostHooks for Chained<P, H> {
    fn on_execute_realtime(&mut self, now: Instant) {
        self.previous.on_execute_realtime(now);
        self.hook.on_execute_realtime(now);
    }

    fn on_report_options(&mut self, newopt: bool, out: &mut dyn fmt::Write) -> fmt::Result {
        self.previous.on_report_options(newopt, out)?;
        self.hook.on_report_options(newopt, out)
    }
}

/// `chain` combinator for any hook set.
pub trait ChainExt: HostHooks + Sized {
    fn chain<H: HostHooks>(self, hook: H) -> Chained<Self, H> {
        Chained::new(self, hook)
    }
}

impl<T: HostHooks> ChainExt for T {}
