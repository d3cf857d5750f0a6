//! Shared test helpers
//!
//! `SimulatedBrain` is an in-memory byte stream that answers host frames
//! the way the real unit does.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};

use brain_config::protocol::{
    encode_packet_from, CommandType, Packet, PacketDecoder, DEVICE_SENDER, HOST_SENDER,
};
use brain_config::{FieldTables, EXPECTED_FIRMWARE};

pub struct SimulatedBrain {
    firmware: Vec<u8>,
    registers: HashMap<(u8, u8), u16>,
    decoder: PacketDecoder,
    outbound: VecDeque<u8>,
    requests: Vec<Packet>,
    written: Vec<u8>,

    /// Payload to echo for the next write instead of the request
    write_echo: Option<Vec<u8>>,

    /// Frames sent verbatim instead of computed replies, one per request
    raw_replies: VecDeque<Vec<u8>>,
}

impl SimulatedBrain {
    pub fn new() -> Self {
        Self {
            firmware: EXPECTED_FIRMWARE.as_bytes().to_vec(),
            registers: HashMap::new(),
            decoder: PacketDecoder::expecting(HOST_SENDER),
            outbound: VecDeque::new(),
            requests: Vec::new(),
            written: Vec::new(),
            write_echo: None,
            raw_replies: VecDeque::new(),
        }
    }

    pub fn with_firmware(mut self, firmware: &str) -> Self {
        self.firmware = firmware.as_bytes().to_vec();
        self
    }

    pub fn with_register(mut self, ns: u8, addr: u8, value: u16) -> Self {
        self.registers.insert((ns, addr), value);
        self
    }

    /// Echo `payload` for the next write request
    pub fn echo_write(mut self, payload: &[u8]) -> Self {
        self.write_echo = Some(payload.to_vec());
        self
    }

    /// Answer the next unanswered request with `frame` verbatim
    pub fn queue_reply(mut self, frame: &[u8]) -> Self {
        self.raw_replies.push_back(frame.to_vec());
        self
    }

    /// Answer the first request after the handshake with `frame` verbatim
    pub fn reply_after_handshake(self, frame: &[u8]) -> Self {
        let version = encode_packet_from(DEVICE_SENDER, CommandType::Version as u8, &self.firmware);
        self.queue_reply(&version).queue_reply(frame)
    }

    pub fn register(&self, ns: u8, addr: u8) -> Option<u16> {
        self.registers.get(&(ns, addr)).copied()
    }

    pub fn requests(&self) -> &[Packet] {
        &self.requests
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    fn handle(&mut self, request: Packet) {
        self.requests.push(request.clone());

        if let Some(frame) = self.raw_replies.pop_front() {
            self.outbound.extend(frame);
            return;
        }

        let payload = match CommandType::from_byte(request.command) {
            Some(CommandType::Version) => self.firmware.clone(),
            Some(CommandType::Read) => {
                let key = (request.payload[0], request.payload[1]);
                let value = self.registers.get(&key).copied().unwrap_or(0);
                value.to_le_bytes().to_vec()
            }
            Some(CommandType::Write) => {
                let p = &request.payload;
                let value = u16::from_le_bytes([p[2], p[3]]);
                self.registers.insert((p[0], p[1]), value);
                self.write_echo.take().unwrap_or_else(|| p.to_vec())
            }
            None => Vec::new(),
        };

        let frame = encode_packet_from(DEVICE_SENDER, request.command, &payload);
        self.outbound.extend(frame.iter().copied());
    }
}

impl Read for SimulatedBrain {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.outbound.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "simulated brain has nothing to send",
            ));
        }

        let n = buf.len().min(self.outbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.outbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for SimulatedBrain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            self.written.push(byte);
            let packet = self
                .decoder
                .feed(byte)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            if let Some(packet) = packet {
                self.handle(packet);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Small tables shaped like the real ones
pub fn sample_tables() -> FieldTables {
    FieldTables::new(
        ["RxType", "SwashType", "GovDiv", "GovGain", "TailDir"],
        ["Flags", "CyclicRing", "TailGainA", "TailGainB", "PitchMax", "GovRpm"],
    )
    .unwrap()
}
