//! Host firmware services consumed during plugin initialisation: the settings
//! registry and the deferred (real-time) command queue.
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

use crate::protocol::settings::SettingDetails;

/// Severity of a message reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    Info,
    Warning,
}

/// Operator-facing message produced by a deferred command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostMessage {
    pub kind: MessageKind,
    pub text: &'static str,
}

/// Zero-argument command the host runs later, outside the caller's context.
pub type DeferredCommand = fn() -> HostMessage;

/// Host queue of commands to execute on the next real-time pass.
pub trait DeferredQueue {
    /// Queue `command`. Returns `false` if the queue is full.
    fn enqueue(&self, command: DeferredCommand) -> bool;
}

impl<M: RawMutex, const N: usize> DeferredQueue for Channel<M, DeferredCommand, N> {
    fn enqueue(&self, command: DeferredCommand) -> bool {
        self.try_send(command).is_ok()
    }
}

/// Host table of plugin settings.
pub trait SettingsRegistry {
    fn register(&mut self, details: &'static SettingDetails);
}
