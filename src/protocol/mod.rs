//! Protocol Module
//!
//! Defines the wire protocol spoken with the Brain unit.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬─────────────────────────────────────────────┬─────────┐
//! │ 0x55 0x55│ escaped( Sender │ Cmd │ Payload │ Checksum ) │  0x3C   │
//! └──────────┴─────────────────────────────────────────────┴─────────┘
//! ```
//!
//! - Sender: 0x00 host -> device, 0xFF device -> host
//! - Checksum: sum(Sender..Payload) mod 256
//! - Escaping: 0xC3, 0x3C and 0x55 are prefixed with 0xC3
//!
//! ### Commands
//! - 0x01: VERSION - Request: empty.            Reply: firmware string
//! - 0x03: READ    - Request: ns + addr.        Reply: value (2, LE)
//! - 0x04: WRITE   - Request: ns + addr + value. Reply: echo of the request
//!
//! ### Namespaces
//! - 0xFF: global
//! - 0x00, 0x01, 0x02: setup1, setup2, setup3

mod checksum;
mod command;
mod escape;
mod packet;

pub use checksum::checksum;
pub use command::{
    check_value, decode_read_reply, verify_write_reply, Command, CommandType, FieldAddress,
    Namespace,
};
pub use escape::{is_reserved, quote, quote_into, unquote};
pub use packet::{
    decode_frame, encode_packet, encode_packet_from, read_packet, write_packet, Packet,
    PacketDecoder, DEVICE_SENDER, ESCAPE, HEAD, HEAD_BYTE, HOST_SENDER, MIN_FRAME_SIZE, TAIL,
};
