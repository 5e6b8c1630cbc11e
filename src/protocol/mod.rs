//! Relay components: direction queues, the per-tick drain step, baud rate
//! control, persisted settings and the plugin lifecycle tying them together.
pub mod baud;
pub mod plugin;
pub mod queue;
pub mod relay;
pub mod settings;

#[cfg(test)]
pub(crate) mod mock;
