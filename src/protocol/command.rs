//! Command definitions
//!
//! Request payloads and the interpretation of the device's replies.

use std::fmt;
use std::str::FromStr;

use crate::error::{BrainError, Result};

/// Command codes understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Version = 0x01,
    Read = 0x03,
    Write = 0x04,
}

impl CommandType {
    /// Map a wire byte back to a known command
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::Version),
            0x03 => Some(CommandType::Read),
            0x04 => Some(CommandType::Write),
            _ => None,
        }
    }
}

/// Parameter group a field lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Global,
    Setup1,
    Setup2,
    Setup3,
}

impl Namespace {
    /// All namespaces, in read-all order
    pub const ALL: [Namespace; 4] = [
        Namespace::Global,
        Namespace::Setup1,
        Namespace::Setup2,
        Namespace::Setup3,
    ];

    /// Wire encoding
    pub fn to_byte(self) -> u8 {
        match self {
            Namespace::Global => 0xFF,
            Namespace::Setup1 => 0x00,
            Namespace::Setup2 => 0x01,
            Namespace::Setup3 => 0x02,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xFF => Some(Namespace::Global),
            0x00 => Some(Namespace::Setup1),
            0x01 => Some(Namespace::Setup2),
            0x02 => Some(Namespace::Setup3),
            _ => None,
        }
    }

    /// Token used in qualified field names
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Global => "global",
            Namespace::Setup1 => "setup1",
            Namespace::Setup2 => "setup2",
            Namespace::Setup3 => "setup3",
        }
    }

    pub fn is_global(self) -> bool {
        self == Namespace::Global
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| BrainError::UnknownNamespace(s.to_string()))
    }
}

/// A resolved field: namespace plus index into that namespace's table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAddress {
    pub namespace: Namespace,
    pub address: u8,
}

impl FieldAddress {
    pub fn new(namespace: Namespace, address: u8) -> Self {
        Self { namespace, address }
    }
}

impl fmt::Display for FieldAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[0x{:02x}]", self.namespace, self.address)
    }
}

/// A request to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for the firmware identifier
    Version,

    /// Read one field
    Read { field: FieldAddress },

    /// Write one field
    Write { field: FieldAddress, value: u16 },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Version => CommandType::Version,
            Command::Read { .. } => CommandType::Read,
            Command::Write { .. } => CommandType::Write,
        }
    }

    /// Request payload
    ///
    /// - Version: empty
    /// - Read:    ns (1) + addr (1)
    /// - Write:   ns (1) + addr (1) + value (2, little-endian)
    pub fn payload(&self) -> Vec<u8> {
        match *self {
            Command::Version => Vec::new(),
            Command::Read { field } => vec![field.namespace.to_byte(), field.address],
            Command::Write { field, value } => {
                let [lo, hi] = value.to_le_bytes();
                vec![field.namespace.to_byte(), field.address, lo, hi]
            }
        }
    }
}

// =============================================================================
// Reply Interpretation
// =============================================================================

fn expect_command(expected: CommandType, actual: u8) -> Result<()> {
    if actual != expected as u8 {
        return Err(BrainError::ProtocolMismatch {
            expected: expected as u8,
            actual,
        });
    }
    Ok(())
}

/// Check a value against the 16-bit field domain
pub fn check_value(value: i64) -> Result<u16> {
    u16::try_from(value).map_err(|_| BrainError::Range(value))
}

/// Interpret the reply to a Read request
///
/// The device answers with the bare little-endian value; the address is
/// not echoed.
pub fn decode_read_reply(command: u8, payload: &[u8]) -> Result<u16> {
    expect_command(CommandType::Read, command)?;

    match payload {
        [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(BrainError::MalformedPayload {
            command,
            len: payload.len(),
        }),
    }
}

/// Check the reply to a Write request against what was sent
///
/// The echo is the only acknowledgment the device gives, so any difference
/// means the write cannot be trusted.
pub fn verify_write_reply(field: FieldAddress, value: u16, command: u8, payload: &[u8]) -> Result<()> {
    expect_command(CommandType::Write, command)?;

    let [ns, addr, lo, hi] = payload else {
        return Err(BrainError::MalformedPayload {
            command,
            len: payload.len(),
        });
    };

    let expected = [field.namespace.to_byte(), field.address];
    if [*ns, *addr] != expected {
        return Err(BrainError::AddressMismatch {
            expected,
            actual: [*ns, *addr],
        });
    }

    let written = u16::from_le_bytes([*lo, *hi]);
    if written != value {
        return Err(BrainError::WriteVerification {
            expected: value,
            actual: written,
        });
    }

    Ok(())
}
