//! Error types for brain-config
//!
//! Every failure is surfaced to the caller immediately; nothing is retried
//! inside the crate.

use thiserror::Error;

/// Result type alias using BrainError
pub type Result<T> = std::result::Result<T, BrainError>;

/// Unified error type for brain-config operations
#[derive(Debug, Error)]
pub enum BrainError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Malformed packet from Brain: {0}")]
    Framing(String),

    #[error("Incorrect packet checksum from Brain: expected 0x{expected:02x}, got 0x{actual:02x}")]
    Checksum { expected: u8, actual: u8 },

    #[error("Response from Brain has invalid sender: 0x{0:02x}")]
    Sender(u8),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Brain misinterpreted command {expected} as {actual}")]
    ProtocolMismatch { expected: u8, actual: u8 },

    /// Both sides are `[namespace byte, address]` as seen on the wire
    #[error("Brain misinterpreted address: sent {expected:02x?}, echoed {actual:02x?}")]
    AddressMismatch { expected: [u8; 2], actual: [u8; 2] },

    #[error("Brain wrote incorrect value: sent {expected}, echoed {actual}")]
    WriteVerification { expected: u16, actual: u16 },

    #[error("Unexpected {len} byte payload in response to command {command}")]
    MalformedPayload { command: u8, len: usize },

    #[error("Value {0} is outside the 16-bit range 0..=65535")]
    Range(i64),

    // -------------------------------------------------------------------------
    // Name Resolution Errors
    // -------------------------------------------------------------------------
    #[error("Configuration parameter should have namespace and name separated by \".\": {0:?}")]
    Syntax(String),

    #[error("Top-level namespace should be one of \"global\", \"setup1\", \"setup2\" or \"setup3\", got {0:?}")]
    UnknownNamespace(String),

    #[error("Configuration parameter {name} not in {namespace} namespace")]
    UnknownField { namespace: String, name: String },

    // -------------------------------------------------------------------------
    // Handshake Errors
    // -------------------------------------------------------------------------
    #[error("Incompatible Brain firmware found: {found:?}, expect {expected:?}")]
    Incompatibility { found: String, expected: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
