//! # brain-config
//!
//! Inspect and modify the tunable parameters of a Brain flybarless unit
//! over its serial link:
//! - Framed, escaped, checksummed packet codec
//! - Version handshake against a known firmware identifier
//! - Field read, and field write confirmed by the device's echo
//! - Name resolution against external field tables
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Brain (device connection)                    │
//! │       connect / version / read_field / write_field           │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!   ┌────────────────────────┐       ┌────────────────────┐
//!   │   Command codec        │       │   Field tables     │
//!   │ (payloads, echo check) │       │ (name -> address)  │
//!   └───────────┬────────────┘       └────────────────────┘
//!               │
//!               ▼
//!   ┌────────────────────────┐
//!   │   Packet codec         │
//!   │ (escape, checksum)     │
//!   └───────────┬────────────┘
//!               │
//!               ▼
//!   ┌────────────────────────┐
//!   │   Byte stream          │
//!   │ (serial port, 115200)  │
//!   └────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod fields;
pub mod device;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BrainError, Result};
pub use config::{Config, DEFAULT_BAUD_RATE, EXPECTED_FIRMWARE};
pub use device::{Brain, SerialTransport};
pub use fields::{resolve_name, FieldResolver, FieldTables};
pub use protocol::{FieldAddress, Namespace};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of brain-config
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
