//! Unsigned LEB128, the encoding of ID-address payloads.

use super::AddressError;
use crate::config::MAX_VARINT_LENGTH;

pub fn encode(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LENGTH);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// Decodes a varint that must span the whole of `bytes`.
///
/// Rejects trailing bytes, truncated input, overflow past 64 bits and
/// non-minimal encodings (a redundant `0x00` final group).
pub fn decode_exact(bytes: &[u8]) -> Result<u64, AddressError> {
    if bytes.is_empty() || bytes.len() > MAX_VARINT_LENGTH {
        return Err(AddressError::InvalidVarint);
    }

    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let group = u64::from(byte & 0x7f);
        let shift = 7 * i as u32;
        if shift == 63 && group > 1 {
            return Err(AddressError::InvalidVarint);
        }
        value |= group << shift;

        let last = i == bytes.len() - 1;
        let continues = byte & 0x80 != 0;
        if continues == last {
            return Err(AddressError::InvalidVarint);
        }
        if last && byte == 0 && i > 0 {
            return Err(AddressError::InvalidVarint);
        }
    }
    Ok(value)
}
