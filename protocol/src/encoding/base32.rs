//! # Base32
//!
//! Variant-parameterised base32 encoding between raw bytes and text.
//!
//! Four variants share two code paths. The RFC flavours differ only in the
//! alphabet; Crockford additionally drops padding by default and forgives the
//! transcription mistakes humans make (`o` for `0`, `l` for `1`).
//!
//! ```text
//! RFC3548 / RFC4648   ABCDEFGHIJKLMNOPQRSTUVWXYZ234567   padded
//! RFC4648-HEX         0123456789ABCDEFGHIJKLMNOPQRSTUV   padded
//! Crockford           0123456789ABCDEFGHJKMNPQRSTVWXYZ   unpadded
//! ```
//!
//! Bits are consumed MSB-first. A trailing group of fewer than 5 bits is
//! left-shifted into a full symbol on encode; on decode, a trailing group of
//! fewer than 8 bits is discarded.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const RFC4648_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const RFC4648_HEX_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const PADDING: char = '=';

/// Errors produced by the base32 codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base32Error {
    /// The variant tag is not one of the four supported names.
    #[error("unknown base32 variant: {0}")]
    UnknownVariant(String),

    /// The input contains a character outside the selected alphabet.
    #[error("invalid character found: {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// The alphabet and padding convention to encode or decode with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base32Variant {
    /// RFC 3548. Same alphabet and padding as RFC 4648.
    Rfc3548,
    /// RFC 4648 section 6.
    Rfc4648,
    /// RFC 4648 section 7, "extended hex".
    Rfc4648Hex,
    /// Douglas Crockford's human-friendly alphabet.
    Crockford,
}

impl Base32Variant {
    /// Every supported variant, in tag order.
    pub const ALL: [Base32Variant; 4] = [
        Self::Rfc3548,
        Self::Rfc4648,
        Self::Rfc4648Hex,
        Self::Crockford,
    ];

    fn alphabet(self) -> &'static [u8; 32] {
        match self {
            Self::Rfc3548 | Self::Rfc4648 => RFC4648_ALPHABET,
            Self::Rfc4648Hex => RFC4648_HEX_ALPHABET,
            Self::Crockford => CROCKFORD_ALPHABET,
        }
    }

    /// Whether `encode` pads when the caller does not say otherwise.
    pub fn default_padding(self) -> bool {
        !matches!(self, Self::Crockford)
    }

    /// The tag used on the command line and in configuration.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rfc3548 => "RFC3548",
            Self::Rfc4648 => "RFC4648",
            Self::Rfc4648Hex => "RFC4648-HEX",
            Self::Crockford => "Crockford",
        }
    }
}

impl fmt::Display for Base32Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Base32Variant {
    type Err = Base32Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.tag() == s)
            .ok_or_else(|| Base32Error::UnknownVariant(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Encode / Decode
// ---------------------------------------------------------------------------

/// Encodes `data` as base32 text.
///
/// `padding` overrides the variant default when set. With padding on, `=` is
/// appended until the output length is a multiple of 8.
///
/// # Example
///
/// ```
/// use filtx_protocol::encoding::base32::{encode, Base32Variant};
///
/// assert_eq!(encode(b"foobar", Base32Variant::Rfc4648, None), "MZXW6YTBOI======");
/// assert_eq!(encode(b"foobar", Base32Variant::Rfc4648, Some(false)), "MZXW6YTBOI");
/// ```
pub fn encode(data: &[u8], variant: Base32Variant, padding: Option<bool>) -> String {
    let alphabet = variant.alphabet();
    let padding = padding.unwrap_or_else(|| variant.default_padding());

    let mut output = String::with_capacity((data.len() * 8).div_ceil(5).next_multiple_of(8));
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;

        while bits >= 5 {
            bits -= 5;
            output.push(alphabet[((buffer >> bits) & 31) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }

    if bits > 0 {
        output.push(alphabet[((buffer << (5 - bits)) & 31) as usize] as char);
    }

    if padding {
        while output.len() % 8 != 0 {
            output.push(PADDING);
        }
    }

    output
}

/// Decodes base32 `input` back into bytes.
///
/// Trailing `=` padding is stripped for every variant. RFC variants are
/// case-sensitive. Crockford upper-cases the input and maps `O` to `0` and
/// `I`/`L` to `1` before the alphabet lookup.
///
/// The output holds `floor(len * 5 / 8)` bytes of the normalised input; a
/// trailing partial byte is dropped.
///
/// # Errors
///
/// [`Base32Error::InvalidCharacter`] for any character outside the alphabet.
pub fn decode(input: &str, variant: Base32Variant) -> Result<Vec<u8>, Base32Error> {
    let unpadded = input.trim_end_matches(PADDING);
    let normalized: String = match variant {
        Base32Variant::Rfc3548 | Base32Variant::Rfc4648 | Base32Variant::Rfc4648Hex => {
            unpadded.to_string()
        }
        Base32Variant::Crockford => unpadded
            .to_ascii_uppercase()
            .chars()
            .map(|c| match c {
                'O' => '0',
                'I' | 'L' => '1',
                other => other,
            })
            .collect(),
    };

    let alphabet = variant.alphabet();
    let mut output = Vec::with_capacity(normalized.chars().count() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for (position, character) in normalized.chars().enumerate() {
        let index = read_char(alphabet, character)
            .ok_or(Base32Error::InvalidCharacter { character, position })?;

        buffer = (buffer << 5) | index;
        bits += 5;

        if bits >= 8 {
            bits -= 8;
            output.push(((buffer >> bits) & 0xff) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    Ok(output)
}

fn read_char(alphabet: &[u8; 32], character: char) -> Option<u32> {
    if !character.is_ascii() {
        return None;
    }
    alphabet
        .iter()
        .position(|&symbol| symbol == character as u8)
        .map(|index| index as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
