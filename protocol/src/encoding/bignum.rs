//! Sign-octet / big-endian-magnitude encoding for arbitrary-precision integers.
//!
//! ```text
//! "0"      -> []                      (zero has no bytes at all)
//! "2500"   -> [0x00, 0x09, 0xc4]
//! "-2500"  -> [0x01, 0x09, 0xc4]      (decodable, never valid for amounts)
//! ```
//!
//! The magnitude is minimal: no leading zero bytes. Decoding is lenient about
//! a lone sign octet (`[0x00]` reads as zero) because some encoders emit it.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use thiserror::Error;

use crate::config::{SIGN_NEGATIVE, SIGN_POSITIVE};

/// Errors from converting between text, integers and canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BigNumError {
    /// The text is not a non-negative integer literal in the given radix.
    #[error("invalid number format: {input:?} is not a non-negative base-{radix} integer")]
    InvalidNumberFormat { input: String, radix: u32 },

    /// The leading octet is neither `0x00` nor `0x01`.
    #[error("invalid sign octet 0x{0:02x}")]
    InvalidSignOctet(u8),

    /// A negative value was decoded where only non-negative values are allowed.
    #[error("value must not be negative")]
    Negative,
}

/// Parses `text` as a non-negative integer in `radix` (2..=36).
///
/// Only digits of the radix are accepted: no sign, no whitespace, no `_`
/// separators. Leading zeros are fine.
pub fn parse_unsigned(text: &str, radix: u32) -> Result<BigUint, BigNumError> {
    let invalid = || BigNumError::InvalidNumberFormat {
        input: text.to_string(),
        radix,
    };

    if !(2..=36).contains(&radix) || text.is_empty() {
        return Err(invalid());
    }
    if !text.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    BigUint::parse_bytes(text.as_bytes(), radix).ok_or_else(invalid)
}

/// Converts decimal (or other radix) text into the canonical byte form.
///
/// # Example
///
/// ```
/// use filtx_protocol::encoding::bignum::to_canonical_bytes;
///
/// assert_eq!(to_canonical_bytes("2500", 10).unwrap(), vec![0x00, 0x09, 0xc4]);
/// assert!(to_canonical_bytes("0", 10).unwrap().is_empty());
/// ```
pub fn to_canonical_bytes(text: &str, radix: u32) -> Result<Vec<u8>, BigNumError> {
    Ok(encode_unsigned(&parse_unsigned(text, radix)?))
}

/// Canonical bytes for a non-negative magnitude.
pub fn encode_unsigned(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    let magnitude = value.to_bytes_be();
    let mut out = Vec::with_capacity(magnitude.len() + 1);
    out.push(SIGN_POSITIVE);
    out.extend_from_slice(&magnitude);
    out
}

/// Canonical bytes for a signed value.
pub fn encode_signed(value: &BigInt) -> Vec<u8> {
    let (sign, magnitude) = value.to_bytes_be();
    match sign {
        Sign::NoSign => Vec::new(),
        Sign::Plus | Sign::Minus => {
            let mut out = Vec::with_capacity(magnitude.len() + 1);
            out.push(if sign == Sign::Minus {
                SIGN_NEGATIVE
            } else {
                SIGN_POSITIVE
            });
            out.extend_from_slice(&magnitude);
            out
        }
    }
}

/// Reads canonical bytes back into a signed integer.
///
/// An empty slice is zero. Anything else must start with a valid sign octet.
pub fn decode(bytes: &[u8]) -> Result<BigInt, BigNumError> {
    let Some((&sign_octet, magnitude)) = bytes.split_first() else {
        return Ok(BigInt::zero());
    };

    let sign = match sign_octet {
        SIGN_POSITIVE => Sign::Plus,
        SIGN_NEGATIVE => Sign::Minus,
        other => return Err(BigNumError::InvalidSignOctet(other)),
    };

    Ok(BigInt::from_bytes_be(sign, magnitude))
}

/// Reads canonical bytes as a non-negative integer, rejecting the negative
/// sign octet.
pub fn decode_unsigned(bytes: &[u8]) -> Result<BigUint, BigNumError> {
    if bytes.first() == Some(&SIGN_NEGATIVE) {
        return Err(BigNumError::Negative);
    }
    decode(bytes)?.to_biguint().ok_or(BigNumError::Negative)
}

/// Renders canonical bytes as decimal text. Negative values keep their `-`;
/// rejecting them is the caller's call.
pub fn from_canonical_bytes(bytes: &[u8]) -> Result<String, BigNumError> {
    Ok(decode(bytes)?.to_str_radix(10))
}
