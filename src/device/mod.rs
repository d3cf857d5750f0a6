//! Device Module
//!
//! Talks to a Brain unit over a byte stream.
//!
//! ## Responsibilities
//! - Open the serial port (fixed 115200 baud by default)
//! - Firmware handshake at connect time
//! - Field read and verified field write

mod brain;
mod serial;

pub use brain::Brain;
pub use serial::SerialTransport;
