//! # Addresses
//!
//! An address names an actor on chain. It has a binary form, used inside
//! transactions, and a string form, used by humans:
//!
//! ```text
//! binary:  protocol (1 byte) || payload
//! string:  network char || protocol digit || rest
//!
//! rest (id):     decimal actor id                      f01234
//! rest (other):  base32lower(payload || checksum)      f1kwuuz3fch7...
//!
//! checksum = blake2b-32(protocol || payload)
//! ```
//!
//! The binary form does not carry a network. Decoding one therefore needs the
//! network supplied from outside, which is why [`Address::from_bytes`] takes
//! one.

mod network;
mod varint;

pub use network::Network;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{
    BLS_PUBLIC_KEY_LENGTH, CHECKSUM_LENGTH, PAYLOAD_HASH_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};
use crate::crypto::hash::{checksum, get_payload_secp256k1};
use crate::encoding::base32::{self, Base32Variant};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while reading an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address is too short: {0:?}")]
    TooShort(String),

    #[error("unknown network prefix {0:?}")]
    UnknownNetwork(char),

    #[error("unknown network name {0:?}")]
    UnknownNetworkName(String),

    #[error("unknown address protocol {0}")]
    UnknownProtocol(u8),

    #[error("invalid payload length for {protocol} address: expected {expected} bytes, got {got}")]
    InvalidPayloadLength {
        protocol: Protocol,
        expected: usize,
        got: usize,
    },

    #[error("invalid actor id varint")]
    InvalidVarint,

    #[error("invalid actor id {0:?}")]
    InvalidId(String),

    #[error("address is not valid base32: {0}")]
    InvalidEncoding(String),

    #[error("address checksum mismatch")]
    InvalidChecksum,

    #[error("invalid public key length: expected {expected} bytes, got {got}")]
    InvalidPublicKey { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Which kind of payload an address carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Protocol {
    Id = 0,
    Secp256k1 = 1,
    Actor = 2,
    Bls = 3,
}

impl Protocol {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, AddressError> {
        match code {
            0 => Ok(Self::Id),
            1 => Ok(Self::Secp256k1),
            2 => Ok(Self::Actor),
            3 => Ok(Self::Bls),
            other => Err(AddressError::UnknownProtocol(other)),
        }
    }

    /// Fixed payload length for hash and key protocols; `None` for ids.
    fn payload_length(self) -> Option<usize> {
        match self {
            Self::Id => None,
            Self::Secp256k1 | Self::Actor => Some(PAYLOAD_HASH_LENGTH),
            Self::Bls => Some(BLS_PUBLIC_KEY_LENGTH),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::Secp256k1 => write!(f, "secp256k1"),
            Self::Actor => write!(f, "actor"),
            Self::Bls => write!(f, "bls"),
        }
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// An actor address on a given network.
///
/// # Examples
///
/// ```
/// use filtx_protocol::address::{Address, Network};
///
/// let addr: Address = "f01234".parse().unwrap();
/// assert_eq!(addr.to_bytes(), vec![0x00, 0xd2, 0x09]);
/// assert_eq!(Address::from_bytes(Network::Mainnet, &addr.to_bytes()).unwrap(), addr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    protocol: Protocol,
    /// Raw payload: the varint for ids, the hash or key bytes otherwise.
    payload: Vec<u8>,
}

impl Address {
    /// An ID address (`f0...`).
    pub fn new_id(network: Network, id: u64) -> Self {
        Self {
            network,
            protocol: Protocol::Id,
            payload: varint::encode(id),
        }
    }

    /// A secp256k1 address derived from an uncompressed public key.
    pub fn new_secp256k1(network: Network, public_key: &[u8]) -> Result<Self, AddressError> {
        if public_key.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH {
            return Err(AddressError::InvalidPublicKey {
                expected: UNCOMPRESSED_PUBLIC_KEY_LENGTH,
                got: public_key.len(),
            });
        }
        Ok(Self {
            network,
            protocol: Protocol::Secp256k1,
            payload: get_payload_secp256k1(public_key).to_vec(),
        })
    }

    /// An address from a protocol and its raw payload.
    pub fn from_payload(
        network: Network,
        protocol: Protocol,
        payload: &[u8],
    ) -> Result<Self, AddressError> {
        match protocol.payload_length() {
            Some(expected) if payload.len() != expected => {
                return Err(AddressError::InvalidPayloadLength {
                    protocol,
                    expected,
                    got: payload.len(),
                });
            }
            Some(_) => {}
            None => {
                varint::decode_exact(payload)?;
            }
        }
        Ok(Self {
            network,
            protocol,
            payload: payload.to_vec(),
        })
    }

    /// Reads the binary form (`protocol || payload`).
    pub fn from_bytes(network: Network, bytes: &[u8]) -> Result<Self, AddressError> {
        let (&code, payload) = bytes.split_first().ok_or(AddressError::Empty)?;
        Self::from_payload(network, Protocol::from_code(code)?, payload)
    }

    /// The binary form (`protocol || payload`).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 1);
        out.push(self.protocol.code());
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The actor id, for ID addresses.
    pub fn id(&self) -> Option<u64> {
        match self.protocol {
            Protocol::Id => varint::decode_exact(&self.payload).ok(),
            _ => None,
        }
    }

    /// The same address rendered under another network.
    pub fn with_network(&self, network: Network) -> Self {
        Self {
            network,
            ..self.clone()
        }
    }

    /// Equality on protocol and payload only.
    pub fn same_actor(&self, other: &Address) -> bool {
        self.protocol == other.protocol && self.payload == other.payload
    }

    fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
        checksum(&self.to_bytes())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.network.prefix(), self.protocol.code())?;

        if let Some(id) = self.id() {
            return write!(f, "{id}");
        }

        let mut raw = self.payload.clone();
        raw.extend_from_slice(&self.checksum());
        let text = base32::encode(&raw, Base32Variant::Rfc4648, Some(false));
        f.write_str(&text.to_ascii_lowercase())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let network_char = chars.next().ok_or(AddressError::Empty)?;
        let protocol_char = chars
            .next()
            .ok_or_else(|| AddressError::TooShort(s.to_string()))?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return Err(AddressError::TooShort(s.to_string()));
        }

        let network = Network::from_prefix(network_char)?;
        let code = protocol_char
            .to_digit(10)
            .ok_or_else(|| AddressError::InvalidEncoding(s.to_string()))?;
        let protocol = Protocol::from_code(code as u8)?;

        if protocol == Protocol::Id {
            if !rest.bytes().all(|b| b.is_ascii_digit()) || (rest.len() > 1 && rest.starts_with('0'))
            {
                return Err(AddressError::InvalidId(rest.to_string()));
            }
            let id = rest
                .parse::<u64>()
                .map_err(|_| AddressError::InvalidId(rest.to_string()))?;
            return Ok(Self::new_id(network, id));
        }

        if rest.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(AddressError::InvalidEncoding(s.to_string()));
        }
        let upper = rest.to_ascii_uppercase();
        let raw = base32::decode(&upper, Base32Variant::Rfc4648)
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        if base32::encode(&raw, Base32Variant::Rfc4648, Some(false)) != upper {
            return Err(AddressError::InvalidEncoding(s.to_string()));
        }
        if raw.len() < CHECKSUM_LENGTH {
            return Err(AddressError::TooShort(s.to_string()));
        }

        let (payload, sum) = raw.split_at(raw.len() - CHECKSUM_LENGTH);
        let address = Self::from_payload(network, protocol, payload)?;
        if address.checksum() != sum {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
