//! Brain connection
//!
//! Request/response exchanges with one Brain unit.

use std::io::{Read, Write};

use bytes::Bytes;

use super::SerialTransport;
use crate::config::{Config, EXPECTED_FIRMWARE};
use crate::error::{BrainError, Result};
use crate::fields::{resolve_name, FieldResolver};
use crate::protocol::{
    check_value, decode_read_reply, read_packet, verify_write_reply, write_packet, Command,
    FieldAddress, Packet,
};

/// An open, version-checked connection to a Brain unit
///
/// ## Concurrency Model
///
/// Strictly one outstanding request. Every call writes a request frame and
/// then blocks reading the reply before returning, so the transport is
/// never shared between exchanges. Callers that share a device across
/// threads must lock around whole calls.
pub struct Brain<T> {
    /// Exclusively owned byte channel
    transport: T,

    /// Firmware identifier read during the handshake
    firmware: Bytes,
}

impl Brain<SerialTransport> {
    /// Open the serial device from `config` and run the handshake
    pub fn open(config: &Config) -> Result<Self> {
        let transport = SerialTransport::open(config)?;
        Self::connect_expecting(transport, &config.expected_firmware)
    }
}

impl<T: Read + Write> Brain<T> {
    /// Handshake against the default firmware identifier
    pub fn connect(transport: T) -> Result<Self> {
        Self::connect_expecting(transport, EXPECTED_FIRMWARE)
    }

    /// Handshake over `transport`
    ///
    /// The firmware string must equal `expected` byte for byte. On mismatch
    /// no further commands are sent and the transport is dropped.
    pub fn connect_expecting(mut transport: T, expected: &str) -> Result<Self> {
        let firmware = exchange(&mut transport, Command::Version)?.payload;

        if firmware[..] != *expected.as_bytes() {
            let found = String::from_utf8_lossy(&firmware).into_owned();
            tracing::warn!(found = %found, expected, "Rejecting incompatible firmware");
            return Err(BrainError::Incompatibility {
                found,
                expected: expected.to_string(),
            });
        }

        tracing::info!("Connected to Brain firmware {}", expected);
        Ok(Self { transport, firmware })
    }

    /// Firmware identifier cached at connect time
    pub fn firmware(&self) -> &[u8] {
        &self.firmware
    }

    /// Query the firmware identifier again
    ///
    /// The reply payload is returned verbatim; its command byte is not checked.
    pub fn version(&mut self) -> Result<Bytes> {
        Ok(self.exchange(Command::Version)?.payload)
    }

    /// Read one field
    pub fn read_field(&mut self, field: FieldAddress) -> Result<u16> {
        let reply = self.exchange(Command::Read { field })?;
        let value = decode_read_reply(reply.command, &reply.payload)?;

        tracing::debug!(%field, value, "Read field");
        Ok(value)
    }

    /// Write one field and verify the device's echo
    ///
    /// Values outside 0..=0xFFFF are rejected before anything is sent.
    pub fn write_field(&mut self, field: FieldAddress, value: i64) -> Result<()> {
        let value = check_value(value)?;
        let reply = self.exchange(Command::Write { field, value })?;

        if let Err(e) = verify_write_reply(field, value, reply.command, &reply.payload) {
            tracing::warn!(%field, value, error = %e, "Write not confirmed");
            return Err(e);
        }

        tracing::debug!(%field, value, "Wrote field");
        Ok(())
    }

    /// Resolve `name` and read it
    pub fn read_named<R>(&mut self, resolver: &R, name: &str) -> Result<u16>
    where
        R: FieldResolver + ?Sized,
    {
        let field = resolve_name(resolver, name)?;
        self.read_field(field)
    }

    /// Resolve `name` and write it
    pub fn write_named<R>(&mut self, resolver: &R, name: &str, value: i64) -> Result<()>
    where
        R: FieldResolver + ?Sized,
    {
        let field = resolve_name(resolver, name)?;
        self.write_field(field, value)
    }

    /// Release the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    fn exchange(&mut self, command: Command) -> Result<Packet> {
        exchange(&mut self.transport, command)
    }
}

/// Send one request and wait for its reply
fn exchange<T: Read + Write>(transport: &mut T, command: Command) -> Result<Packet> {
    write_packet(transport, command.command_type() as u8, &command.payload())?;
    read_packet(transport)
}
