//! Boundary with the collaborators the relay does not own: transceiver driver,
//! settings storage, host scheduler, plus interop with `embedded-can` frames.
pub mod frame;
pub mod traits;
