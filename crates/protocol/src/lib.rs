//! # Protocol
//!
//! Binary command/telemetry protocol for the feeder controller.
//!
//! Frame format:
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0..N bytes): fixed-width fields in declared order,
//!   multi-byte fields little-endian
//! - CRC (2 bytes): Modbus CRC16 over TYPE + PAYLOAD, high byte first
//!
//! The CRC byte order is the opposite of the payload field endianness.
//! That is what the firmware actually expects on the wire; keep it.

mod crc;
mod error;
mod message;

pub use crc::{append_crc16, crc16};
pub use error::ProtocolError;
pub use message::{
    decode_any, Message, CRC_LEN, MSG_EMPTY, MSG_ENTER_BOOTLOADER, MSG_ERROR, MSG_ROTATE_SERVO,
    MSG_SET_LED_LEVEL,
};
