//! # Signature Container
//!
//! A signature travels as a type tag plus raw bytes. The JSON form used by
//! wallets and RPC nodes is:
//!
//! ```json
//! { "Type": 1, "Data": "<base64>" }
//! ```
//!
//! On chain the same pair is a single byte string: `type || data`.
//!
//! Only secp256k1 signatures can be recovered into an address. Their data is
//! always 65 bytes: the compact `(r, s)` pair followed by the recovery id.
//! BLS signatures are carried through untouched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{COMPACT_SIGNATURE_LENGTH, MAX_RECOVERY_ID, SECP256K1_SIGNATURE_LENGTH};

/// Errors while reading a signature container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("unknown signature type {0}")]
    UnknownType(u8),

    #[error("signature data is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("signature bytes are empty")]
    Empty,

    #[error("invalid {sig_type} signature length: expected {expected} bytes, got {got}")]
    InvalidLength {
        sig_type: SignatureType,
        expected: usize,
        got: usize,
    },

    #[error("recovery id {0} is out of range")]
    InvalidRecoveryId(u8),

    #[error("signature type {0} does not support public key recovery")]
    NotRecoverable(SignatureType),
}

// ---------------------------------------------------------------------------
// SignatureType
// ---------------------------------------------------------------------------

/// The signature scheme a container holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignatureType {
    Secp256k1 = 1,
    Bls = 2,
}

impl SignatureType {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, SignatureError> {
        match code {
            1 => Ok(Self::Secp256k1),
            2 => Ok(Self::Bls),
            other => Err(SignatureError::UnknownType(other)),
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secp256k1 => write!(f, "secp256k1"),
            Self::Bls => write!(f, "bls"),
        }
    }
}

impl Serialize for SignatureType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for SignatureType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A typed signature over a message digest.
///
/// Deserialisation goes through [`Signature::new`], so JSON input gets the
/// same length check as every other constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignatureRecord")]
pub struct Signature {
    #[serde(rename = "Type")]
    sig_type: SignatureType,

    #[serde(rename = "Data", serialize_with = "base64_data::serialize")]
    data: Vec<u8>,
}

/// Unchecked `{Type, Data}` as read from JSON.
#[derive(Deserialize)]
struct SignatureRecord {
    #[serde(rename = "Type")]
    sig_type: SignatureType,

    #[serde(rename = "Data", deserialize_with = "base64_data::deserialize")]
    data: Vec<u8>,
}

impl TryFrom<SignatureRecord> for Signature {
    type Error = SignatureError;

    fn try_from(record: SignatureRecord) -> Result<Self, Self::Error> {
        Self::new(record.sig_type, record.data)
    }
}

impl Signature {
    /// Wraps raw signature bytes. Length is checked for secp256k1 only.
    pub fn new(sig_type: SignatureType, data: Vec<u8>) -> Result<Self, SignatureError> {
        if sig_type == SignatureType::Secp256k1 && data.len() != SECP256K1_SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength {
                sig_type,
                expected: SECP256K1_SIGNATURE_LENGTH,
                got: data.len(),
            });
        }
        Ok(Self { sig_type, data })
    }

    pub(crate) fn secp256k1(data: [u8; SECP256K1_SIGNATURE_LENGTH]) -> Self {
        Self {
            sig_type: SignatureType::Secp256k1,
            data: data.to_vec(),
        }
    }

    /// Builds a container from the base64 text a wallet hands out.
    pub fn from_base64(sig_type: SignatureType, text: &str) -> Result<Self, SignatureError> {
        let data = STANDARD
            .decode(text.trim())
            .map_err(|e| SignatureError::InvalidBase64(e.to_string()))?;
        Self::new(sig_type, data)
    }

    /// Reads the on-chain `type || data` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let (&code, data) = bytes.split_first().ok_or(SignatureError::Empty)?;
        Self::new(SignatureType::from_code(code)?, data.to_vec())
    }

    pub fn sig_type(&self) -> SignatureType {
        self.sig_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// The on-chain `type || data` form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.push(self.sig_type.code());
        out.extend_from_slice(&self.data);
        out
    }

    /// Splits a secp256k1 signature into its compact `(r, s)` bytes and the
    /// recovery id.
    pub fn secp256k1_parts(&self) -> Result<([u8; COMPACT_SIGNATURE_LENGTH], u8), SignatureError> {
        if self.sig_type != SignatureType::Secp256k1 {
            return Err(SignatureError::NotRecoverable(self.sig_type));
        }
        if self.data.len() != SECP256K1_SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength {
                sig_type: self.sig_type,
                expected: SECP256K1_SIGNATURE_LENGTH,
                got: self.data.len(),
            });
        }

        let recovery_id = self.data[COMPACT_SIGNATURE_LENGTH];
        if recovery_id > MAX_RECOVERY_ID {
            return Err(SignatureError::InvalidRecoveryId(recovery_id));
        }

        let mut compact = [0u8; COMPACT_SIGNATURE_LENGTH];
        compact.copy_from_slice(&self.data[..COMPACT_SIGNATURE_LENGTH]);
        Ok((compact, recovery_id))
    }
}

mod base64_data {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
