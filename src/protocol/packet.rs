//! Packet codec
//!
//! Frames outgoing packets and reassembles incoming ones.
//!
//! ## Frame Layout
//! ```text
//! ┌─────────┬──────────────────────────────────────────────┬──────────┐
//! │ "UU" (2)│ escaped( Sender (1) │ Cmd (1) │ Payload │ Sum (1) ) │ "<" (1)  │
//! └─────────┴──────────────────────────────────────────────┴──────────┘
//! ```
//!
//! The checksum covers the unescaped sender, command and payload bytes.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::checksum::checksum;
use super::escape::quote_into;
use crate::error::{BrainError, Result};

/// Frame head marker
pub const HEAD: [u8; 2] = [HEAD_BYTE, HEAD_BYTE];

/// The byte the head marker is made of ('U')
pub const HEAD_BYTE: u8 = 0x55;

/// Frame tail marker ('<')
pub const TAIL: u8 = 0x3C;

/// Escape marker
pub const ESCAPE: u8 = 0xC3;

/// Sender id of every packet the host sends
pub const HOST_SENDER: u8 = 0x00;

/// Sender id of every packet the device sends
pub const DEVICE_SENDER: u8 = 0xFF;

/// Smallest complete frame: head + sender + command + checksum + tail
pub const MIN_FRAME_SIZE: usize = HEAD.len() + 4;

/// A single unescaped packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub sender: u8,
    pub command: u8,
    pub payload: Bytes,
}

// =============================================================================
// Encoding
// =============================================================================

/// Frame a host packet
pub fn encode_packet(command: u8, payload: &[u8]) -> Bytes {
    encode_packet_from(HOST_SENDER, command, payload)
}

/// Frame a packet with an arbitrary sender id
pub fn encode_packet_from(sender: u8, command: u8, payload: &[u8]) -> Bytes {
    let mut body = BytesMut::with_capacity(payload.len() + 3);
    body.put_u8(sender);
    body.put_u8(command);
    body.put_slice(payload);
    let sum = checksum(&body);
    body.put_u8(sum);

    // Worst case every body byte needs an escape marker
    let mut frame = BytesMut::with_capacity(HEAD.len() + body.len() * 2 + 1);
    frame.put_slice(&HEAD);
    quote_into(&body, &mut frame);
    frame.put_u8(TAIL);

    frame.freeze()
}

// =============================================================================
// Decoding
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Collecting bytes, watching for escape and tail markers
    Accumulating,

    /// Previous byte was an escape marker; the next one is literal
    Escaped,
}

/// Incremental frame decoder
///
/// Fed one byte at a time. Escape markers are dropped as they arrive, so the
/// internal buffer always holds the unescaped frame. A bare tail byte
/// completes the frame, which is then validated and the decoder resets.
#[derive(Debug)]
pub struct PacketDecoder {
    state: DecodeState,
    buffer: BytesMut,
    expected_sender: u8,
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketDecoder {
    /// Decoder for packets coming from the device
    pub fn new() -> Self {
        Self::expecting(DEVICE_SENDER)
    }

    /// Decoder accepting only packets from `sender`
    pub fn expecting(sender: u8) -> Self {
        Self {
            state: DecodeState::Accumulating,
            buffer: BytesMut::with_capacity(32),
            expected_sender: sender,
        }
    }

    /// True when no partial frame is buffered
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Accumulating && self.buffer.is_empty()
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(packet))` once a complete, valid frame has been seen.
    /// A complete but invalid frame is discarded and reported as an error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>> {
        match self.state {
            DecodeState::Escaped => {
                self.buffer.put_u8(byte);
                self.state = DecodeState::Accumulating;
                Ok(None)
            }
            DecodeState::Accumulating if byte == ESCAPE => {
                self.state = DecodeState::Escaped;
                Ok(None)
            }
            DecodeState::Accumulating => {
                self.buffer.put_u8(byte);
                if byte != TAIL {
                    return Ok(None);
                }

                let frame = self.buffer.split();
                validate_frame(&frame, self.expected_sender).map(Some)
            }
        }
    }
}

/// Check an unescaped, tail-terminated frame and split it into a packet
fn validate_frame(frame: &[u8], expected_sender: u8) -> Result<Packet> {
    if !frame.starts_with(&HEAD) {
        return Err(BrainError::Framing(format!("malformed header: {}", hex(frame))));
    }

    if frame.len() < MIN_FRAME_SIZE {
        return Err(BrainError::Framing(format!(
            "frame too short ({} bytes): {}",
            frame.len(),
            hex(frame)
        )));
    }

    let checksum_pos = frame.len() - 2;
    let body = &frame[HEAD.len()..checksum_pos];
    let expected = checksum(body);
    let actual = frame[checksum_pos];
    if expected != actual {
        return Err(BrainError::Checksum { expected, actual });
    }

    let sender = body[0];
    if sender != expected_sender {
        return Err(BrainError::Sender(sender));
    }

    Ok(Packet {
        sender,
        command: body[1],
        payload: Bytes::copy_from_slice(&body[2..]),
    })
}

/// Decode one complete escaped frame held in memory
///
/// The slice must contain exactly one frame, ending with its tail byte.
pub fn decode_frame(bytes: &[u8], expected_sender: u8) -> Result<Packet> {
    let mut decoder = PacketDecoder::expecting(expected_sender);

    for (i, &byte) in bytes.iter().enumerate() {
        if let Some(packet) = decoder.feed(byte)? {
            if i + 1 != bytes.len() {
                return Err(BrainError::Framing(format!(
                    "{} trailing bytes after tail",
                    bytes.len() - i - 1
                )));
            }
            return Ok(packet);
        }
    }

    Err(BrainError::Framing(format!("incomplete frame: {}", hex(bytes))))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one device packet from a stream
///
/// Reads a byte at a time and blocks until a tail byte arrives or the
/// stream fails. Stream errors are returned unchanged.
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    let mut decoder = PacketDecoder::new();
    let mut byte = [0u8; 1];

    loop {
        reader.read_exact(&mut byte)?;
        if let Some(packet) = decoder.feed(byte[0])? {
            tracing::debug!(
                command = packet.command,
                payload = %hex(&packet.payload),
                "Received packet"
            );
            return Ok(packet);
        }
    }
}

/// Frame and write one host packet to a stream
pub fn write_packet<W: Write>(writer: &mut W, command: u8, payload: &[u8]) -> Result<()> {
    let frame = encode_packet(command, payload);
    tracing::debug!(command, frame = %hex(&frame), "Sending packet");
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Lowercase hex dump used in log lines and error messages
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
