//!
//! Compact size unsigned integers.
//!
//! Prefix byte `< 0xfd` is the value itself, `0xfd`, `0xfe` and `0xff`
//! are followed by a little-endian u16, u32 and u64 respectively.
//! Non-minimal encodings are accepted.
//!

use crate::parser::errors::{OpError, OpResult};
use byteorder::{ByteOrder, LittleEndian};

const PREFIX_U16: u8 = 0xfd;
const PREFIX_U32: u8 = 0xfe;
const PREFIX_U64: u8 = 0xff;

///
/// Decode one varint at `offset`, returning the value and the offset
/// right after it.
///
pub fn decode(buffer: &[u8], offset: usize) -> OpResult<(u64, usize)> {
    let prefix = *buffer.get(offset).ok_or(OpError::TruncatedInput {
        offset,
        needed: 1,
        remaining: buffer.len().saturating_sub(offset),
    })?;
    let width = match prefix {
        PREFIX_U16 => 2,
        PREFIX_U32 => 4,
        PREFIX_U64 => 8,
        _ => return Ok((prefix as u64, offset + 1)),
    };
    let start = offset + 1;
    let remaining = buffer.len() - start;
    if remaining < width {
        return Err(OpError::TruncatedInput {
            offset: start,
            needed: width,
            remaining,
        });
    }
    let body = &buffer[start..start + width];
    let value = match width {
        2 => LittleEndian::read_u16(body) as u64,
        4 => LittleEndian::read_u32(body) as u64,
        _ => LittleEndian::read_u64(body),
    };
    Ok((value, start + width))
}

/// number of bytes the minimal encoding of `n` occupies
pub fn encoded_len(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// minimal encoding of `n`
pub fn encode(n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(n));
    match encoded_len(n) {
        1 => out.push(n as u8),
        3 => {
            out.push(PREFIX_U16);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        5 => {
            out.push(PREFIX_U32);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(PREFIX_U64);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        let cases: [(u64, usize); 11] = [
            (0, 1),
            (1, 1),
            (252, 1),
            (253, 3),
            (254, 3),
            (255, 3),
            (0xffff, 3),
            (0x10000, 5),
            (0xffff_ffff, 5),
            (0x1_0000_0000, 9),
            (u64::MAX, 9),
        ];
        for (n, len) in cases.iter() {
            let bytes = encode(*n);
            assert_eq!(bytes.len(), *len, "encoded length of {}", n);
            assert_eq!(encoded_len(*n), *len);
            assert_eq!(decode(&bytes, 0).unwrap(), (*n, *len));
        }
    }

    #[test]
    fn test_decode_at_offset() {
        let buf = [0xaa, 0xfd, 0x34, 0x12, 0x07];
        assert_eq!(decode(&buf, 1).unwrap(), (0x1234, 4));
        assert_eq!(decode(&buf, 4).unwrap(), (7, 5));
    }

    #[test]
    fn test_non_minimal_accepted() {
        assert_eq!(decode(&[0xfd, 0x01, 0x00], 0).unwrap(), (1, 3));
        assert_eq!(decode(&[0xfe, 0x05, 0, 0, 0], 0).unwrap(), (5, 5));
    }

    #[test]
    fn test_truncated_prefix_body() {
        match decode(&[0xfd, 0x01], 0) {
            Err(OpError::TruncatedInput {
                offset,
                needed,
                remaining,
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 2);
                assert_eq!(remaining, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            decode(&[0xff, 0, 0, 0], 0),
            Err(OpError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_empty_buffer() {
        assert!(matches!(
            decode(&[], 0),
            Err(OpError::TruncatedInput { needed: 1, .. })
        ));
        assert!(matches!(
            decode(&[1, 2], 5),
            Err(OpError::TruncatedInput { remaining: 0, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(n in any::<u64>()) {
            let bytes = encode(n);
            prop_assert_eq!(decode(&bytes, 0).unwrap(), (n, bytes.len()));
        }
    }
}
