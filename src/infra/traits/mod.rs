//! Abstraction traits for the external collaborators (driver, storage, host, timer).
pub mod host;
pub mod relay_timer;
pub mod settings_store;
pub mod transceiver;
