//! Modbus-style CRC16 checksum engine.

/// Polynomial for the reflected Modbus CRC16
const POLY: u16 = 0xA001;

/// Compute the Modbus CRC16 of a byte sequence.
///
/// Init 0xFFFF, poly 0xA001, LSB-first. Pure and total: any input,
/// including empty, is valid.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            let lsb = crc & 0x0001;
            crc >>= 1;
            if lsb != 0 {
                crc ^= POLY;
            }
        }
    }
    crc
}

/// Append the CRC16 of `data` to it, high byte first then low byte.
///
/// The high-before-low order is part of the wire format and deliberately
/// differs from the little-endian payload fields.
pub fn append_crc16(mut data: Vec<u8>) -> Vec<u8> {
    let crc = crc16(&data);
    data.push((crc >> 8) as u8);
    data.push((crc & 0xFF) as u8);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_known_vector() {
        // Canonical CRC-16/MODBUS check value
        assert_eq!(crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn test_crc16_empty_input() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_crc16_deterministic() {
        let data = [10u8, 0, 0x84, 0x03];
        assert_eq!(crc16(&data), crc16(&data));
        assert_eq!(crc16(&data), 0xFD20);
    }

    #[test]
    fn test_append_crc16_high_byte_first() {
        let framed = append_crc16(vec![10, 0, 0x84, 0x03]);
        assert_eq!(framed, vec![10, 0, 0x84, 0x03, 0xFD, 0x20]);
    }

    #[test]
    fn test_append_crc16_empty() {
        assert_eq!(append_crc16(Vec::new()), vec![0xFF, 0xFF]);
    }

    #[test]
    fn test_single_bit_sensitivity() {
        let clean = crc16(&[0x01, 0x02, 0x03]);
        for bit in 0..24 {
            let mut corrupted = [0x01u8, 0x02, 0x03];
            corrupted[bit / 8] ^= 1 << (bit % 8);
            assert_ne!(crc16(&corrupted), clean, "bit {bit} went undetected");
        }
    }
}
