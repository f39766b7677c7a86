//! Core value types for transactions.
//!
//! [`TokenAmount`] is the one that matters: every quantity the protocol
//! defines as non-negative (`value`, `gasFeeCap`, `gasPremium`) is a
//! `TokenAmount`, so a negative amount cannot be represented once a
//! transaction exists.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::encoding::bignum::{self, BigNumError};

// ---------------------------------------------------------------------------
// TokenAmount
// ---------------------------------------------------------------------------

/// A non-negative arbitrary-precision quantity in attoFIL.
///
/// Text form is plain decimal; wire form is the sign-octet / magnitude
/// encoding from [`crate::encoding::bignum`].
///
/// # Examples
///
/// ```
/// use filtx_protocol::transaction::TokenAmount;
///
/// let amount: TokenAmount = "2500".parse().unwrap();
/// assert_eq!(amount.to_canonical_bytes(), vec![0x00, 0x09, 0xc4]);
/// assert_eq!(amount.to_string(), "2500");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(BigUint);

impl TokenAmount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Parses decimal text. Rejects signs, separators and empty input.
    pub fn from_decimal(text: &str) -> Result<Self, BigNumError> {
        bignum::parse_unsigned(text, 10).map(Self)
    }

    /// Reads the wire form; a negative sign octet is an error.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, BigNumError> {
        bignum::decode_unsigned(bytes).map(Self)
    }

    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        bignum::encode_unsigned(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for TokenAmount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl FromStr for TokenAmount {
    type Err = BigNumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(s)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_decimal(&text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount() {
        let zero = TokenAmount::zero();
        assert!(zero.is_zero());
        assert!(zero.to_canonical_bytes().is_empty());
        assert_eq!(zero.to_string(), "0");
        assert_eq!(TokenAmount::from_canonical_bytes(&[]).unwrap(), zero);
    }

    #[test]
    fn rejects_negative_text() {
        assert!("-1".parse::<TokenAmount>().is_err());
    }

    #[test]
    fn rejects_negative_wire_value() {
        assert_eq!(
            TokenAmount::from_canonical_bytes(&[0x01, 0x05]),
            Err(BigNumError::Negative)
        );
    }

    #[test]
    fn display_strips_leading_zeros() {
        assert_eq!("000123".parse::<TokenAmount>().unwrap().to_string(), "123");
    }

    #[test]
    fn ordering_follows_magnitude() {
        assert!(TokenAmount::from(10) > TokenAmount::from(9));
    }

    #[test]
    fn serde_as_decimal_string() {
        let amount: TokenAmount = "100000000000000000000000".parse().unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"100000000000000000000000\"");
        let back: TokenAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
