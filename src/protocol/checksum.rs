//! Additive 8-bit checksum
//!
//! Covers the unescaped sender, command and payload bytes of a packet.

/// Sum of all bytes modulo 256
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}
