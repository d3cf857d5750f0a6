//! Byte escaping
//!
//! The head, tail and escape markers may never appear bare inside a frame
//! body. Each occurrence is prefixed with the escape marker; the receiver
//! drops the marker and takes the following byte literally.

use bytes::BufMut;

use super::packet::{ESCAPE, HEAD_BYTE, TAIL};

/// True for the three byte values that must be escaped on the wire
#[inline]
pub fn is_reserved(byte: u8) -> bool {
    byte == ESCAPE || byte == TAIL || byte == HEAD_BYTE
}

/// Escape `data` into `out`
///
/// Works byte by byte, so an inserted escape marker is never itself
/// re-examined.
pub fn quote_into<B: BufMut>(data: &[u8], out: &mut B) {
    for &byte in data {
        if is_reserved(byte) {
            out.put_u8(ESCAPE);
        }
        out.put_u8(byte);
    }
}

/// Escape `data` into a new buffer
pub fn quote(data: &[u8]) -> Vec<u8> {
    let extra = data.iter().filter(|&&b| is_reserved(b)).count();
    let mut out = Vec::with_capacity(data.len() + extra);
    quote_into(data, &mut out);
    out
}

/// Remove escaping from a complete byte sequence
///
/// An escape marker makes the next byte literal, whatever its value.
/// A trailing lone escape marker is dropped.
pub fn unquote(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut escaped = false;

    for &byte in data {
        if escaped {
            out.push(byte);
            escaped = false;
        } else if byte == ESCAPE {
            escaped = true;
        } else {
            out.push(byte);
        }
    }

    out
}
