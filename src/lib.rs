//! `canbus-relay` library: the CAN bus message relay of a motion-controller
//! firmware, in a `no_std` environment. Two fixed-capacity single-producer /
//! single-consumer ring buffers (TX and RX) decouple the transceiver driver from
//! the firmware logic; a polling step driven by the host's real-time tick drains
//! them one message per direction per millisecond.
#![no_std]
//==================================================================================
/// Core data types: the CAN message and the queue direction.
pub mod core;
/// Error types for queueing, storage, settings and transceiver start-up.
pub mod error;
/// Boundary with the outside world: collaborator traits and frame interop.
pub mod infra;
/// Relay logic: ring buffers, drain step, baud rate control, settings and
/// plugin lifecycle.
pub mod protocol;
//==================================================================================
