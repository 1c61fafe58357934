use std::io::{Read, Seek};

use super::{ReadResult, Reader};

/// The largest value a 4-byte variable-length quantity can hold (28 bits)
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

impl<R: Read + Seek> Reader<R> {
    /// Read a variable-length quantity.
    ///
    /// Returns the value and the number of bytes consumed. At most 4 bytes
    /// are read; a continuation bit on the fourth byte is ignored.
    pub fn read_vlq(&mut self) -> ReadResult<(u32, u8)> {
        let mut value: u32 = 0;
        let mut read = 0;
        loop {
            let byte = self.read_u8()?;
            read += 1;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 || read == 4 {
                return Ok((value, read));
            }
        }
    }
}

/// Encode a value as a variable-length quantity.
///
/// Values above [`VLQ_MAX`] are truncated to their low 28 bits.
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let value = value & VLQ_MAX;
    let mut groups = [0u8; 4];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    groups[..len]
        .iter()
        .rev()
        .enumerate()
        .map(|(i, group)| if i + 1 < len { group | 0x80 } else { *group })
        .collect()
}

#[test]
fn test_read_vlq() {
    fn read(bytes: &[u8]) -> (u32, u8) {
        Reader::from_byte_slice(bytes).read_vlq().unwrap()
    }
    assert_eq!(read(&[0x00]), (0, 1));
    assert_eq!(read(&[0x7F]), (0x7F, 1));
    assert_eq!(read(&[0x81, 0x00]), (0x80, 2));
    assert_eq!(read(&[0xFF, 0x7F]), (0x3FFF, 2));
    assert_eq!(read(&[0x87, 0x68]), (0x3E8, 2));
    assert_eq!(read(&[0xBD, 0x84, 0x40]), (0xF4240, 3));
    assert_eq!(read(&[0xFF, 0xFF, 0xFF, 0x7F]), (VLQ_MAX, 4));
}

#[test]
fn vlq_stops_after_four_bytes() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x80, 0x80, 0x80, 0x05]);
    assert_eq!(reader.read_vlq().unwrap(), (0x0020_0000, 4));
    assert_eq!(reader.read_u8().unwrap(), 0x05);
}

#[test]
fn vlq_round_trips_at_group_boundaries() {
    for value in [0, 127, 128, 16_383, 16_384, VLQ_MAX] {
        let bytes = encode_vlq(value);
        let (decoded, read) = Reader::from_byte_slice(&bytes).read_vlq().unwrap();
        assert_eq!(decoded, value);
        assert_eq!(read as usize, bytes.len());
    }
    assert_eq!(encode_vlq(128), [0x81, 0x00]);
}

#[test]
fn vlq_running_out_is_truncated() {
    let err = Reader::from_byte_slice(&[0x81]).read_vlq().unwrap_err();
    assert!(err.is_truncated());
}
