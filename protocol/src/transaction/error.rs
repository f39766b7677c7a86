//! Error types for transaction construction and decoding.
//!
//! Every fallible transaction operation returns a [`TransactionError`]. No
//! failure is downgraded to a default: a bad input never yields a zeroed or
//! partially filled [`super::Transaction`].

use std::fmt;

use thiserror::Error;

use crate::address::AddressError;
use crate::crypto::SignatureError;
use crate::encoding::bignum::BigNumError;

/// The JSON type a text-record field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A non-empty string.
    Text,
    /// A non-empty string with no `-`.
    UnsignedText,
    /// A string, possibly empty, holding base64.
    Base64,
    /// A JSON number that fits an unsigned 64-bit integer.
    Number,
    /// A JSON object.
    Object,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "a non-empty string"),
            Self::UnsignedText => write!(f, "a non-empty string without '-'"),
            Self::Base64 => write!(f, "a base64 string"),
            Self::Number => write!(f, "a number (unsigned 64-bit)"),
            Self::Object => write!(f, "an object"),
        }
    }
}

/// One text-record field that is absent or has the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// The record key, e.g. `"GasLimit"`.
    pub field: &'static str,
    /// What the key should have held.
    pub expected: FieldKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is a required field and has to be {}",
            self.field, self.expected
        )
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while building, encoding or decoding a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// `value` was empty or carried a `-`.
    #[error("value must not be empty or negative: {0:?}")]
    InvalidValue(String),

    /// The version is not the single supported one.
    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(u64),

    /// The CBOR is not a 10-element array or an element has the wrong type.
    #[error("malformed transaction encoding: {0}")]
    MalformedEncoding(String),

    /// A decoded amount field carries the negative sign octet.
    #[error("{field} can't be negative")]
    NegativeValue { field: &'static str },

    /// One or more text-record fields are absent or mistyped. Every field is
    /// checked; all violations are listed in record order.
    #[error("invalid transaction record: {}", join_violations(.0))]
    MissingOrInvalidField(Vec<FieldViolation>),

    /// The text record is not a JSON object.
    #[error("transaction record should be a JSON object")]
    NotARecord,

    /// An amount is not a valid integer literal.
    #[error("{field}: {source}")]
    InvalidNumberFormat {
        field: &'static str,
        #[source]
        source: BigNumError,
    },

    /// An address could not be read.
    #[error("{field} address: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: AddressError,
    },

    /// `Params` is not valid base64.
    #[error("params are not valid base64: {0}")]
    InvalidParams(String),

    /// The signature element of a signed transaction could not be read.
    #[error("invalid signature: {0}")]
    Signature(#[from] SignatureError),

    /// The CBOR writer failed.
    #[error("failed to encode transaction: {0}")]
    Encode(#[from] serde_cbor::Error),

    /// The JSON text could not be parsed or produced.
    #[error("invalid transaction JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransactionError {
    /// The record keys named by a [`TransactionError::MissingOrInvalidField`].
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        match self {
            Self::MissingOrInvalidField(violations) => {
                violations.iter().map(|v| v.field).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_message_names_field_and_type() {
        let err = TransactionError::MissingOrInvalidField(vec![FieldViolation {
            field: "GasLimit",
            expected: FieldKind::Number,
        }]);
        assert_eq!(
            err.to_string(),
            "invalid transaction record: 'GasLimit' is a required field and has to be a number (unsigned 64-bit)"
        );
        assert_eq!(err.invalid_fields(), vec!["GasLimit"]);
    }

    #[test]
    fn other_errors_name_no_fields() {
        assert!(TransactionError::NotARecord.invalid_fields().is_empty());
    }

    #[test]
    fn negative_value_message() {
        let err = TransactionError::NegativeValue { field: "Value" };
        assert_eq!(err.to_string(), "Value can't be negative");
    }
}
