//! A transaction paired with its signature.
//!
//! Binary form is a two-element CBOR array: the ten-element transaction
//! array, then the signature as one byte string (`type || data`). JSON form
//! nests the text record and the signature container:
//!
//! ```json
//! { "Message": { "To": "...", ... }, "Signature": { "Type": 1, "Data": "..." } }
//! ```

use serde::{Deserialize, Serialize};
use serde_cbor::Value;
use tracing::debug;

use super::builder::Transaction;
use super::codec::decode_canonical;
use super::error::{FieldKind, FieldViolation, TransactionError};
use super::record::TransactionRecord;
use super::verification::{recover_signer, VerifiableMessage, VerifyError};
use crate::address::{Address, Network};
use crate::config::{MULTIBASE_BASE32, SIGNED_TX_FIELD_COUNT};
use crate::crypto::hash::message_cid_bytes;
use crate::crypto::signatures::{Signature, SignatureType};
use crate::encoding::base32::{self, Base32Variant};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignedRecord<'a> {
    message: TransactionRecord,
    signature: &'a Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    message: Transaction,
    signature: Signature,
}

impl SignedTransaction {
    /// Pairs a message with a signature. Nothing is checked; see
    /// [`SignedTransaction::verify`].
    pub fn new(message: Transaction, signature: Signature) -> Self {
        Self { message, signature }
    }

    pub fn message(&self) -> &Transaction {
        &self.message
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn into_parts(self) -> (Transaction, Signature) {
        (self.message, self.signature)
    }

    /// Recovers the signer and checks it against `message.from`.
    ///
    /// Addresses are compared by protocol and payload, so a mainnet sender
    /// matches the same key rendered for testnet.
    pub fn verify(&self) -> Result<Address, VerifyError> {
        let network = self.message.from().network();
        let recovered = recover_signer(
            VerifiableMessage::Transaction(&self.message),
            &self.signature,
            network,
        )?;

        if !recovered.same_actor(self.message.from()) {
            return Err(VerifyError::SignerMismatch {
                expected: self.message.from().clone(),
                recovered,
            });
        }
        Ok(recovered)
    }

    // -- CBOR ---------------------------------------------------------------

    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let value = Value::Array(vec![
            self.message.to_cbor_value(),
            Value::Bytes(self.signature.to_bytes()),
        ]);
        Ok(serde_cbor::to_vec(&value)?)
    }

    pub fn parse(network: Network, bytes: &[u8]) -> Result<Self, TransactionError> {
        let value = decode_canonical(bytes)?;

        let fields = match value {
            Value::Array(fields) if fields.len() == SIGNED_TX_FIELD_COUNT => fields,
            _ => {
                return Err(TransactionError::MalformedEncoding(format!(
                    "signed transaction should be an array of {SIGNED_TX_FIELD_COUNT}"
                )))
            }
        };

        let mut fields = fields.into_iter();
        let message = Transaction::from_cbor_value(network, fields.next().unwrap_or(Value::Null))?;
        let signature = match fields.next() {
            Some(Value::Bytes(bytes)) => Signature::from_bytes(&bytes)?,
            _ => {
                return Err(TransactionError::MalformedEncoding(
                    "signature should be a byte string".to_string(),
                ))
            }
        };

        debug!(sig_type = %signature.sig_type(), "parsed signed transaction");
        Ok(Self { message, signature })
    }

    pub fn parse_hex(network: Network, hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| TransactionError::MalformedEncoding(format!("invalid hex: {e}")))?;
        Self::parse(network, &bytes)
    }

    /// CID under which the chain stores this message. BLS-signed messages
    /// are stored unsigned, so their CID is the bare message CID.
    pub fn cid(&self) -> Result<String, TransactionError> {
        if self.signature.sig_type() == SignatureType::Bls {
            return self.message.cid();
        }
        let cid = message_cid_bytes(&self.serialize()?);
        let body = base32::encode(&cid, Base32Variant::Rfc4648, Some(false));
        Ok(format!("{MULTIBASE_BASE32}{}", body.to_ascii_lowercase()))
    }

    // -- JSON ---------------------------------------------------------------

    pub fn to_json(&self) -> Result<String, TransactionError> {
        let record = SignedRecord {
            message: self.message.to_record(),
            signature: &self.signature,
        };
        Ok(serde_json::to_string(&record)?)
    }

    pub fn from_json(text: &str) -> Result<Self, TransactionError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(TransactionError::NotARecord)?;

        let violations: Vec<FieldViolation> = ["Message", "Signature"]
            .into_iter()
            .filter(|key| !object.get(*key).is_some_and(serde_json::Value::is_object))
            .map(|field| FieldViolation {
                field,
                expected: FieldKind::Object,
            })
            .collect();
        if !violations.is_empty() {
            return Err(TransactionError::MissingOrInvalidField(violations));
        }

        let message = Transaction::from_record(&object["Message"])?;
        let signature = Signature::deserialize(&object["Signature"])?;
        Ok(Self { message, signature })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
