//! Message variants and the type-id registry.
//!
//! Every variant has a fixed encoded length known before decoding. Adding
//! a message means adding a variant, a `body_len` entry, and encode/decode
//! arms; the registry is the pair of matches in `body_len` and
//! `decode_body`.

use crate::crc::{append_crc16, crc16};
use crate::error::ProtocolError;

// Message type identifiers
pub const MSG_EMPTY: u8 = 0;
pub const MSG_ERROR: u8 = 1;
pub const MSG_ROTATE_SERVO: u8 = 10;
pub const MSG_SET_LED_LEVEL: u8 = 101;
pub const MSG_ENTER_BOOTLOADER: u8 = 125;

/// Trailing checksum length in bytes
pub const CRC_LEN: usize = 2;

/// Commands and telemetry exchanged with the feeder controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// No-op / presence check
    Empty { hardware_address: u8 },
    /// Error report from the device
    Error { hardware_address: u8, error_id: u8 },
    /// Move the feeder servo to an absolute position
    RotateServo { hardware_address: u8, angle: u16 },
    /// Set the illumination LED brightness (0-100)
    SetLedLevel { hardware_address: u8, level: u8 },
    /// Reboot the controller into its USB bootloader
    EnterBootloader { hardware_address: u8 },
}

impl Message {
    /// The wire type identifier of this variant
    pub fn type_id(&self) -> u8 {
        match self {
            Message::Empty { .. } => MSG_EMPTY,
            Message::Error { .. } => MSG_ERROR,
            Message::RotateServo { .. } => MSG_ROTATE_SERVO,
            Message::SetLedLevel { .. } => MSG_SET_LED_LEVEL,
            Message::EnterBootloader { .. } => MSG_ENTER_BOOTLOADER,
        }
    }

    /// Fixed body length (type id + payload, CRC excluded) for a type id,
    /// or `None` if the id is not registered
    pub fn body_len(type_id: u8) -> Option<usize> {
        match type_id {
            MSG_EMPTY => Some(2),
            MSG_ERROR => Some(3),
            MSG_ROTATE_SERVO => Some(4),
            MSG_SET_LED_LEVEL => Some(3),
            MSG_ENTER_BOOTLOADER => Some(2),
            _ => None,
        }
    }

    /// Total encoded frame length of this variant, CRC included
    pub fn encoded_len(&self) -> usize {
        let body = match self {
            Message::Empty { .. } | Message::EnterBootloader { .. } => 2,
            Message::Error { .. } | Message::SetLedLevel { .. } => 3,
            Message::RotateServo { .. } => 4,
        };
        body + CRC_LEN
    }

    /// Encode this message into a checksum-appended frame
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.encoded_len());
        body.push(self.type_id());
        match *self {
            Message::Empty { hardware_address }
            | Message::EnterBootloader { hardware_address } => {
                body.push(hardware_address);
            }
            Message::Error {
                hardware_address,
                error_id,
            } => {
                body.push(hardware_address);
                body.push(error_id);
            }
            Message::RotateServo {
                hardware_address,
                angle,
            } => {
                body.push(hardware_address);
                body.extend_from_slice(&angle.to_le_bytes());
            }
            Message::SetLedLevel {
                hardware_address,
                level,
            } => {
                body.push(hardware_address);
                body.push(level);
            }
        }
        append_crc16(body)
    }
}

/// Decode a complete frame into a message.
///
/// Validation order: overall length, CRC, type registry, per-variant
/// length. The three failure modes are reported distinctly and none of
/// them panics.
pub fn decode_any(frame: &[u8]) -> Result<Message, ProtocolError> {
    if frame.len() < 1 + CRC_LEN {
        return Err(ProtocolError::MalformedLength {
            expected: 1 + CRC_LEN,
            actual: frame.len(),
        });
    }

    let (body, crc_bytes) = frame.split_at(frame.len() - CRC_LEN);
    let computed = crc16(body);
    let received = u16::from(crc_bytes[0]) << 8 | u16::from(crc_bytes[1]);
    if computed != received {
        return Err(ProtocolError::ChecksumMismatch { computed, received });
    }

    let type_id = body[0];
    let expected_body = Message::body_len(type_id)
        .ok_or(ProtocolError::UnrecognizedType { type_id })?;
    if body.len() != expected_body {
        return Err(ProtocolError::MalformedLength {
            expected: expected_body + CRC_LEN,
            actual: frame.len(),
        });
    }

    decode_body(type_id, body)
}

/// Decode a validated, length-checked body
fn decode_body(type_id: u8, body: &[u8]) -> Result<Message, ProtocolError> {
    match type_id {
        MSG_EMPTY => Ok(Message::Empty {
            hardware_address: body[1],
        }),
        MSG_ERROR => Ok(Message::Error {
            hardware_address: body[1],
            error_id: body[2],
        }),
        MSG_ROTATE_SERVO => Ok(Message::RotateServo {
            hardware_address: body[1],
            angle: u16::from_le_bytes([body[2], body[3]]),
        }),
        MSG_SET_LED_LEVEL => Ok(Message::SetLedLevel {
            hardware_address: body[1],
            level: body[2],
        }),
        MSG_ENTER_BOOTLOADER => Ok(Message::EnterBootloader {
            hardware_address: body[1],
        }),
        other => Err(ProtocolError::UnrecognizedType { type_id: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_servo_wire_bytes() {
        // angle 900 = 0x0384, little-endian payload, CRC high-then-low
        let msg = Message::RotateServo {
            hardware_address: 0,
            angle: 900,
        };
        let frame = msg.encode();
        assert_eq!(frame, vec![10, 0, 0x84, 0x03, 0xFD, 0x20]);
        assert_eq!(frame.len(), msg.encoded_len());
    }

    #[test]
    fn test_round_trip_all_variants() {
        let messages = [
            Message::Empty {
                hardware_address: 3,
            },
            Message::Error {
                hardware_address: 0,
                error_id: 7,
            },
            Message::RotateServo {
                hardware_address: 0,
                angle: 900,
            },
            Message::RotateServo {
                hardware_address: 1,
                angle: 0,
            },
            Message::RotateServo {
                hardware_address: 1,
                angle: u16::MAX,
            },
            Message::SetLedLevel {
                hardware_address: 0,
                level: 50,
            },
            Message::EnterBootloader {
                hardware_address: 0,
            },
        ];
        for msg in messages {
            assert_eq!(decode_any(&msg.encode()), Ok(msg));
        }
    }

    #[test]
    fn test_round_trip_angle_domain_sweep() {
        for angle in (0..=u16::MAX).step_by(251) {
            let msg = Message::RotateServo {
                hardware_address: 0,
                angle,
            };
            assert_eq!(decode_any(&msg.encode()), Ok(msg));
        }
    }

    #[test]
    fn test_corrupted_byte_rejected() {
        let frame = Message::RotateServo {
            hardware_address: 0,
            angle: 900,
        }
        .encode();
        for i in 0..frame.len() {
            let mut corrupted = frame.clone();
            corrupted[i] ^= 0xFF;
            match decode_any(&corrupted) {
                Err(ProtocolError::ChecksumMismatch { .. }) => {}
                other => panic!("byte {i}: expected checksum mismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unrecognized_type() {
        // type 42 is not registered; CRC is valid so the registry is what rejects it
        let frame = crate::crc::append_crc16(vec![42, 0]);
        assert_eq!(
            decode_any(&frame),
            Err(ProtocolError::UnrecognizedType { type_id: 42 })
        );
    }

    #[test]
    fn test_malformed_length() {
        // a RotateServo body truncated to 3 bytes, re-framed with a valid CRC
        let frame = crate::crc::append_crc16(vec![MSG_ROTATE_SERVO, 0, 0x84]);
        assert_eq!(
            decode_any(&frame),
            Err(ProtocolError::MalformedLength {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_too_short_frame() {
        assert_eq!(
            decode_any(&[10]),
            Err(ProtocolError::MalformedLength {
                expected: 3,
                actual: 1
            })
        );
        assert!(decode_any(&[]).is_err());
    }
}
