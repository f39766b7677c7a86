//! Canonical CBOR encoding of transactions.
//!
//! The encoding is a definite-length array of exactly ten elements. Integers
//! use the shortest CBOR head; addresses, amounts and params are byte
//! strings. Because there is no map and no optional entry, every
//! transaction has exactly one encoding, and that encoding is what gets
//! signed.
//!
//! Decoding checks, in order: canonical form, container shape, version, then
//! each field. Input that decodes but is not byte-for-byte the canonical
//! encoding (indefinite lengths, oversized heads) is rejected.
//!
//! The version check runs before any other field is looked at, so an
//! unknown version is reported as such even when the rest is garbage.

use serde_cbor::Value;
use tracing::{debug, trace};

use super::builder::Transaction;
use super::error::TransactionError;
use super::types::TokenAmount;
use crate::address::{Address, Network};
use crate::config::{MULTIBASE_BASE32, TX_FIELD_COUNT, TX_VERSION};
use crate::crypto::hash::message_cid_bytes;
use crate::encoding::base32::{self, Base32Variant};
use crate::encoding::bignum::BigNumError;

impl Transaction {
    /// Encodes the transaction as canonical CBOR. These bytes are the
    /// signing input.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(serde_cbor::to_vec(&self.to_cbor_value())?)
    }

    /// Decodes canonical CBOR. Addresses are rendered under `network`, since
    /// the binary form does not carry one.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::MalformedEncoding`]: not CBOR, not canonical
    ///   CBOR, not an array, not ten elements, or an element of the wrong
    ///   CBOR type.
    /// - [`TransactionError::UnsupportedVersion`]: version other than 0.
    /// - [`TransactionError::NegativeValue`]: an amount with sign octet 0x01.
    /// - [`TransactionError::InvalidAddress`]: unreadable `to` / `from`.
    pub fn parse(network: Network, bytes: &[u8]) -> Result<Self, TransactionError> {
        let value = decode_canonical(bytes)?;
        let tx = Self::from_cbor_value(network, value)?;
        debug!(nonce = tx.nonce, method = tx.method, "parsed transaction");
        Ok(tx)
    }

    /// [`Transaction::parse`] for hex-encoded CBOR.
    pub fn parse_hex(network: Network, hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| TransactionError::MalformedEncoding(format!("invalid hex: {e}")))?;
        Self::parse(network, &bytes)
    }

    /// The message CID as multibase text (`bafy2bza...`).
    pub fn cid(&self) -> Result<String, TransactionError> {
        let cid = message_cid_bytes(&self.serialize()?);
        let body = base32::encode(&cid, Base32Variant::Rfc4648, Some(false));
        Ok(format!("{MULTIBASE_BASE32}{}", body.to_ascii_lowercase()))
    }

    pub(crate) fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::Integer(i128::from(self.version)),
            Value::Bytes(self.to.to_bytes()),
            Value::Bytes(self.from.to_bytes()),
            Value::Integer(i128::from(self.nonce)),
            Value::Bytes(self.value.to_canonical_bytes()),
            Value::Integer(i128::from(self.gas_limit)),
            Value::Bytes(self.gas_fee_cap.to_canonical_bytes()),
            Value::Bytes(self.gas_premium.to_canonical_bytes()),
            Value::Integer(i128::from(self.method)),
            Value::Bytes(self.params.clone()),
        ])
    }

    pub(crate) fn from_cbor_value(network: Network, value: Value) -> Result<Self, TransactionError> {
        let Value::Array(fields) = value else {
            return Err(TransactionError::MalformedEncoding(
                "decoded raw tx should be an array".to_string(),
            ));
        };
        if fields.len() != TX_FIELD_COUNT {
            return Err(TransactionError::MalformedEncoding(format!(
                "expected {TX_FIELD_COUNT} fields, got {}",
                fields.len()
            )));
        }
        trace!(fields = fields.len(), "decoding transaction array");

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or(Value::Null);

        let version = as_u64("Version", next())?;
        if version != TX_VERSION {
            return Err(TransactionError::UnsupportedVersion(version));
        }

        let to = as_address("To", network, next())?;
        let from = as_address("From", network, next())?;
        let nonce = as_u64("Nonce", next())?;
        let value = as_amount("Value", next())?;
        let gas_limit = as_u64("GasLimit", next())?;
        let gas_fee_cap = as_amount("GasFeeCap", next())?;
        let gas_premium = as_amount("GasPremium", next())?;
        let method = as_u64("Method", next())?;
        let params = as_bytes("Params", next())?;

        Ok(Self {
            version,
            to,
            from,
            nonce,
            value,
            gas_limit,
            gas_fee_cap,
            gas_premium,
            method,
            params,
        })
    }
}

/// Reads a CBOR item and rejects any encoding other than the canonical one:
/// indefinite-length items and non-minimal integer or length heads all
/// re-encode to different bytes.
///
/// The check runs on the generic [`Value`], so byte-string contents (such as
/// a lone `0x00` amount) are compared as written.
pub(crate) fn decode_canonical(bytes: &[u8]) -> Result<Value, TransactionError> {
    let value: Value = serde_cbor::from_slice(bytes)
        .map_err(|e| TransactionError::MalformedEncoding(e.to_string()))?;
    let canonical = serde_cbor::to_vec(&value)?;
    if canonical != bytes {
        trace!(
            len = bytes.len(),
            canonical_len = canonical.len(),
            "rejected non-canonical CBOR"
        );
        return Err(TransactionError::MalformedEncoding(
            "non-canonical CBOR".to_string(),
        ));
    }
    Ok(value)
}

fn as_u64(field: &'static str, value: Value) -> Result<u64, TransactionError> {
    match value {
        Value::Integer(n) => u64::try_from(n).map_err(|_| {
            TransactionError::MalformedEncoding(format!("{field} out of range: {n}"))
        }),
        other => Err(unexpected(field, "an unsigned integer", &other)),
    }
}

fn as_bytes(field: &'static str, value: Value) -> Result<Vec<u8>, TransactionError> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        other => Err(unexpected(field, "a byte string", &other)),
    }
}

fn as_address(
    field: &'static str,
    network: Network,
    value: Value,
) -> Result<Address, TransactionError> {
    let bytes = as_bytes(field, value)?;
    Address::from_bytes(network, &bytes)
        .map_err(|source| TransactionError::InvalidAddress { field, source })
}

fn as_amount(field: &'static str, value: Value) -> Result<TokenAmount, TransactionError> {
    let bytes = as_bytes(field, value)?;
    TokenAmount::from_canonical_bytes(&bytes).map_err(|source| match source {
        BigNumError::Negative => TransactionError::NegativeValue { field },
        source => TransactionError::InvalidNumberFormat { field, source },
    })
}

fn unexpected(field: &'static str, expected: &str, got: &Value) -> TransactionError {
    TransactionError::MalformedEncoding(format!("{field} should be {expected}, got {got:?}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionBuilder;

    const SENDER: &str = "f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y";

    /// Encoded independently of this crate.
    const SAMPLE_CBOR: &str = "8a004300d209550155a94ceca23feab4d4a49b4426ec2496f0aadd86\
                               054900016345785d8a00001961a8430009c4430005dc0040";

    fn sample() -> Transaction {
        TransactionBuilder::new(
            Address::new_id(Network::Mainnet, 1234),
            SENDER.parse().unwrap(),
        )
        .nonce(5)
        .value("100000000000000000")
        .gas_limit(25_000)
        .gas_fee_cap("2500")
        .gas_premium("1500")
        .build()
        .unwrap()
    }

    /// The sample with one element swapped for `replacement`.
    fn sample_with(index: usize, replacement: Value) -> Vec<u8> {
        let Value::Array(mut fields) = sample().to_cbor_value() else {
            unreachable!()
        };
        fields[index] = replacement;
        serde_cbor::to_vec(&Value::Array(fields)).unwrap()
    }

    #[test]
    fn serialize_known_answer() {
        assert_eq!(hex::encode(sample().serialize().unwrap()), SAMPLE_CBOR);
    }

    #[test]
    fn parse_known_answer() {
        let tx = Transaction::parse_hex(Network::Mainnet, SAMPLE_CBOR).unwrap();
        assert_eq!(tx, sample());
    }

    #[test]
    fn zero_amounts_encode_as_empty_byte_strings() {
        let tx = TransactionBuilder::new(
            Address::new_id(Network::Mainnet, 1234),
            SENDER.parse().unwrap(),
        )
        .build()
        .unwrap();
        assert_eq!(
            hex::encode(tx.serialize().unwrap()),
            "8a004300d209550155a94ceca23feab4d4a49b4426ec2496f0aadd8600400040400040"
        );
    }

    #[test]
    fn parse_uses_the_supplied_network() {
        let tx = Transaction::parse_hex(Network::Testnet, SAMPLE_CBOR).unwrap();
        assert_eq!(tx.from().to_string(), "t1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y");
        assert_eq!(tx.to().to_string(), "t01234");
    }

    #[test]
    fn cid_known_answer() {
        assert_eq!(
            sample().cid().unwrap(),
            "bafy2bzacedbujaggn7nr35dil33lpjvkvoz5ibs52xosy554rrddbsawfutwi"
        );
    }

    #[test]
    fn version_one_is_unsupported() {
        let bytes = sample_with(0, Value::Integer(1));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn version_is_checked_before_other_fields() {
        let mut fields = vec![Value::Integer(1)];
        fields.extend(std::iter::repeat(Value::Null).take(9));
        let bytes = serde_cbor::to_vec(&Value::Array(fields)).unwrap();
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn negative_value_is_rejected() {
        let bytes = sample_with(4, Value::Bytes(vec![0x01, 0x05]));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::NegativeValue { field: "Value" })
        ));
    }

    #[test]
    fn negative_gas_fee_cap_is_rejected() {
        let bytes = sample_with(6, Value::Bytes(vec![0x01, 0x05]));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::NegativeValue { field: "GasFeeCap" })
        ));
    }

    #[test]
    fn bad_sign_octet_is_a_number_format_error() {
        let bytes = sample_with(7, Value::Bytes(vec![0x07, 0x05]));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::InvalidNumberFormat {
                field: "GasPremium",
                ..
            })
        ));
    }

    #[test]
    fn not_an_array() {
        let bytes = serde_cbor::to_vec(&Value::Integer(0)).unwrap();
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn nine_fields_are_too_few() {
        let Value::Array(mut fields) = sample().to_cbor_value() else {
            unreachable!()
        };
        fields.pop();
        let bytes = serde_cbor::to_vec(&Value::Array(fields)).unwrap();
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn eleven_fields_are_too_many() {
        let Value::Array(mut fields) = sample().to_cbor_value() else {
            unreachable!()
        };
        fields.push(Value::Integer(0));
        let bytes = serde_cbor::to_vec(&Value::Array(fields)).unwrap();
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn wrong_element_types() {
        let bytes = sample_with(3, Value::Text("5".into()));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));

        let bytes = sample_with(9, Value::Integer(0));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));

        let bytes = sample_with(5, Value::Integer(-1));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn bad_address_bytes() {
        let bytes = sample_with(1, Value::Bytes(vec![0x09, 0x01]));
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::InvalidAddress { field: "To", .. })
        ));
    }

    #[test]
    fn garbage_and_trailing_bytes() {
        assert!(Transaction::parse(Network::Mainnet, &[0xff, 0x00]).is_err());

        let mut bytes = sample().serialize().unwrap();
        bytes.push(0x00);
        assert!(matches!(
            Transaction::parse(Network::Mainnet, &bytes),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn indefinite_length_array_is_rejected() {
        let hex = format!("9f{}ff", &SAMPLE_CBOR[2..]);
        assert!(matches!(
            Transaction::parse_hex(Network::Mainnet, &hex),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn non_minimal_integer_head_is_rejected() {
        // Nonce 5 written as 0x18 0x05 instead of 0x05.
        assert_eq!(SAMPLE_CBOR.matches("dd860549").count(), 1);
        let hex = SAMPLE_CBOR.replace("dd860549", "dd86180549");
        assert!(matches!(
            Transaction::parse_hex(Network::Mainnet, &hex),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn non_minimal_byte_string_head_is_rejected() {
        // Params (empty) written as 0x58 0x00 instead of 0x40.
        let hex = format!("{}5800", &SAMPLE_CBOR[..SAMPLE_CBOR.len() - 2]);
        assert!(matches!(
            Transaction::parse_hex(Network::Mainnet, &hex),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn lone_zero_sign_octet_amount_is_still_accepted() {
        let bytes = sample_with(4, Value::Bytes(vec![0x00]));
        let tx = Transaction::parse(Network::Mainnet, &bytes).unwrap();
        assert!(tx.value().is_zero());
    }

    #[test]
    fn invalid_hex() {
        assert!(matches!(
            Transaction::parse_hex(Network::Mainnet, "zz"),
            Err(TransactionError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn large_amounts_and_params_roundtrip() {
        let tx = TransactionBuilder::new(
            Address::new_id(Network::Testnet, u64::MAX),
            Address::new_id(Network::Testnet, 0),
        )
        .nonce(u64::MAX)
        .value("2000000000000000000000000000")
        .gas_limit(u64::MAX)
        .gas_fee_cap("340282366920938463463374607431768211456")
        .gas_premium("1")
        .method(3844450837)
        .params(vec![0xa5; 300])
        .build()
        .unwrap();

        let bytes = tx.serialize().unwrap();
        assert_eq!(Transaction::parse(Network::Testnet, &bytes).unwrap(), tx);
    }

    #[test]
    fn serialization_is_deterministic() {
        assert_eq!(sample().serialize().unwrap(), sample().serialize().unwrap());
    }
}
