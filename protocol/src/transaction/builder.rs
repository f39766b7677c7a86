//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] enforces a disciplined construction flow:
//! set the fields, call `.build()`, and get back either a fully valid
//! [`Transaction`] or the first invariant it broke. There is no way to hold a
//! half-built or invalid transaction.

use super::error::TransactionError;
use super::types::TokenAmount;
use crate::address::Address;
use crate::config::TX_VERSION;
use crate::encoding::bignum::BigNumError;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A single outbound message: a value transfer and/or a method call on the
/// receiving actor.
///
/// Immutable once built. Encoding it ([`Transaction::serialize`]) is a pure
/// projection of these fields.
///
/// # Canonical Byte Format
///
/// A 10-element CBOR array, in this order and with no optional entries:
///
/// ```text
/// [version, to, from, nonce, value, gasLimit, gasFeeCap, gasPremium, method, params]
/// ```
///
/// Those exact bytes are what a signer hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub(super) version: u64,
    pub(super) to: Address,
    pub(super) from: Address,
    pub(super) nonce: u64,
    pub(super) value: TokenAmount,
    pub(super) gas_limit: u64,
    pub(super) gas_fee_cap: TokenAmount,
    pub(super) gas_premium: TokenAmount,
    pub(super) method: u64,
    pub(super) params: Vec<u8>,
}

impl Transaction {
    /// Starts a builder for a message from `from` to `to`.
    pub fn builder(to: Address, from: Address) -> TransactionBuilder {
        TransactionBuilder::new(to, from)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Receiving actor.
    pub fn to(&self) -> &Address {
        &self.to
    }

    /// Sending account.
    pub fn from(&self) -> &Address {
        &self.from
    }

    /// Per-sender sequence number.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Amount transferred to `to`, in attoFIL.
    pub fn value(&self) -> &TokenAmount {
        &self.value
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_fee_cap(&self) -> &TokenAmount {
        &self.gas_fee_cap
    }

    pub fn gas_premium(&self) -> &TokenAmount {
        &self.gas_premium
    }

    /// Method number on the receiving actor; 0 is a plain send.
    pub fn method(&self) -> u64 {
        self.method
    }

    /// Raw call parameters (CBOR in practice, opaque here).
    pub fn params(&self) -> &[u8] {
        &self.params
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`] values.
///
/// # Usage
///
/// ```
/// use filtx_protocol::address::{Address, Network};
/// use filtx_protocol::transaction::TransactionBuilder;
///
/// let to = Address::new_id(Network::Mainnet, 1234);
/// let from = Address::new_id(Network::Mainnet, 1000);
///
/// let tx = TransactionBuilder::new(to, from)
///     .nonce(5)
///     .value("100000000000000000")
///     .gas_limit(25_000)
///     .gas_fee_cap("2500")
///     .gas_premium("1500")
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.value().to_string(), "100000000000000000");
/// ```
///
/// Defaults: version 0, nonce 0, value `"0"`, zero gas fields, method 0,
/// empty params.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    version: u64,
    to: Address,
    from: Address,
    nonce: u64,
    value: String,
    gas_limit: u64,
    gas_fee_cap: String,
    gas_premium: String,
    method: u64,
    params: Vec<u8>,
}

impl TransactionBuilder {
    pub fn new(to: Address, from: Address) -> Self {
        Self {
            version: TX_VERSION,
            to,
            from,
            nonce: 0,
            value: "0".to_string(),
            gas_limit: 0,
            gas_fee_cap: "0".to_string(),
            gas_premium: "0".to_string(),
            method: 0,
            params: Vec::new(),
        }
    }

    /// Sets the version. Anything but the supported version fails `build`.
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the transferred amount as decimal text.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn gas_fee_cap(mut self, gas_fee_cap: impl Into<String>) -> Self {
        self.gas_fee_cap = gas_fee_cap.into();
        self
    }

    pub fn gas_premium(mut self, gas_premium: impl Into<String>) -> Self {
        self.gas_premium = gas_premium.into();
        self
    }

    pub fn method(mut self, method: u64) -> Self {
        self.method = method;
        self
    }

    /// Attaches raw call parameters.
    pub fn params(mut self, params: Vec<u8>) -> Self {
        self.params = params;
        self
    }

    /// Consumes the builder and produces a [`Transaction`].
    ///
    /// # Errors
    ///
    /// - [`TransactionError::UnsupportedVersion`] for any version but 0.
    /// - [`TransactionError::InvalidValue`] when `value` is empty or has a `-`.
    /// - [`TransactionError::InvalidNumberFormat`] when an amount is not a
    ///   decimal integer.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.version != TX_VERSION {
            return Err(TransactionError::UnsupportedVersion(self.version));
        }
        if self.value.is_empty() || self.value.contains('-') {
            return Err(TransactionError::InvalidValue(self.value));
        }

        Ok(Transaction {
            version: self.version,
            value: parse_amount("Value", &self.value)?,
            gas_fee_cap: parse_amount("GasFeeCap", &self.gas_fee_cap)?,
            gas_premium: parse_amount("GasPremium", &self.gas_premium)?,
            to: self.to,
            from: self.from,
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            method: self.method,
            params: self.params,
        })
    }
}

fn parse_amount(field: &'static str, text: &str) -> Result<TokenAmount, TransactionError> {
    TokenAmount::from_decimal(text).map_err(|source: BigNumError| {
        TransactionError::InvalidNumberFormat { field, source }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
