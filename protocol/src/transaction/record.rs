//! The flat JSON record form of a transaction.
//!
//! ```json
//! {
//!   "To": "f01234",
//!   "From": "f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y",
//!   "Nonce": 5,
//!   "Value": "100000000000000000",
//!   "Params": "",
//!   "GasFeeCap": "2500",
//!   "GasPremium": "1500",
//!   "GasLimit": 25000,
//!   "Method": 0
//! }
//! ```
//!
//! Incoming records are checked against [`RECORD_SCHEMA`] before anything
//! else. Every key is checked, and all violations are reported together.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::builder::{Transaction, TransactionBuilder};
use super::error::{FieldKind, FieldViolation, TransactionError};
use crate::address::Address;

/// Required keys of the text record and the type each must hold, in the
/// order they are checked and reported.
pub const RECORD_SCHEMA: [(&str, FieldKind); 9] = [
    ("To", FieldKind::Text),
    ("From", FieldKind::Text),
    ("Nonce", FieldKind::Number),
    ("Value", FieldKind::UnsignedText),
    ("GasFeeCap", FieldKind::Text),
    ("GasPremium", FieldKind::Text),
    ("GasLimit", FieldKind::Number),
    ("Method", FieldKind::Number),
    ("Params", FieldKind::Base64),
];

/// Text record of a [`Transaction`]. Amounts stay decimal strings and params
/// stay base64 here; conversion happens in [`TransactionRecord::into_transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRecord {
    pub to: String,
    pub from: String,
    pub nonce: u64,
    pub value: String,
    pub params: String,
    pub gas_fee_cap: String,
    pub gas_premium: String,
    pub gas_limit: u64,
    pub method: u64,
}

impl TransactionRecord {
    /// Checks `record` against [`RECORD_SCHEMA`] and reads it.
    pub fn from_value(record: &Value) -> Result<Self, TransactionError> {
        let object = record.as_object().ok_or(TransactionError::NotARecord)?;

        let violations: Vec<FieldViolation> = RECORD_SCHEMA
            .iter()
            .filter(|(key, kind)| !kind_matches(*kind, object.get(*key)))
            .map(|&(field, expected)| FieldViolation { field, expected })
            .collect();

        if !violations.is_empty() {
            debug!(count = violations.len(), "transaction record failed validation");
            return Err(TransactionError::MissingOrInvalidField(violations));
        }

        Ok(Self::deserialize(record)?)
    }

    /// Resolves addresses, amounts and params into a [`Transaction`].
    pub fn into_transaction(self) -> Result<Transaction, TransactionError> {
        let to = parse_address("To", &self.to)?;
        let from = parse_address("From", &self.from)?;
        let params = STANDARD
            .decode(&self.params)
            .map_err(|e| TransactionError::InvalidParams(e.to_string()))?;

        TransactionBuilder::new(to, from)
            .nonce(self.nonce)
            .value(self.value)
            .gas_limit(self.gas_limit)
            .gas_fee_cap(self.gas_fee_cap)
            .gas_premium(self.gas_premium)
            .method(self.method)
            .params(params)
            .build()
    }
}

fn kind_matches(kind: FieldKind, value: Option<&Value>) -> bool {
    match (kind, value) {
        (FieldKind::Text, Some(Value::String(s))) => !s.is_empty(),
        (FieldKind::UnsignedText, Some(Value::String(s))) => !s.is_empty() && !s.contains('-'),
        (FieldKind::Base64, Some(Value::String(_))) => true,
        (FieldKind::Number, Some(n)) => n.as_u64().is_some(),
        (FieldKind::Object, Some(Value::Object(_))) => true,
        _ => false,
    }
}

fn parse_address(field: &'static str, text: &str) -> Result<Address, TransactionError> {
    text.parse()
        .map_err(|source| TransactionError::InvalidAddress { field, source })
}

impl Transaction {
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            to: self.to.to_string(),
            from: self.from.to_string(),
            nonce: self.nonce,
            value: self.value.to_string(),
            params: STANDARD.encode(&self.params),
            gas_fee_cap: self.gas_fee_cap.to_string(),
            gas_premium: self.gas_premium.to_string(),
            gas_limit: self.gas_limit,
            method: self.method,
        }
    }

    /// Builds a transaction from an already-parsed JSON record.
    ///
    /// # Errors
    ///
    /// [`TransactionError::MissingOrInvalidField`] lists every key that is
    /// absent or mistyped. After that, address, amount and params failures
    /// are reported one at a time.
    pub fn from_record(record: &Value) -> Result<Self, TransactionError> {
        TransactionRecord::from_value(record)?.into_transaction()
    }

    pub fn to_json(&self) -> Result<String, TransactionError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(text: &str) -> Result<Self, TransactionError> {
        let record: Value = serde_json::from_str(text)?;
        Self::from_record(&record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "To": "f01234",
            "From": "f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y",
            "Nonce": 5,
            "Value": "100000000000000000",
            "Params": "",
            "GasFeeCap": "2500",
            "GasPremium": "1500",
            "GasLimit": 25000,
            "Method": 0
        })
    }

    fn without(key: &str) -> Value {
        let mut record = sample_record();
        record.as_object_mut().unwrap().remove(key);
        record
    }

    fn with(key: &str, value: Value) -> Value {
        let mut record = sample_record();
        record[key] = value;
        record
    }

    #[test]
    fn record_matches_cbor_encoding() {
        let tx = Transaction::from_record(&sample_record()).unwrap();
        assert_eq!(
            hex::encode(tx.serialize().unwrap()),
            "8a004300d209550155a94ceca23feab4d4a49b4426ec2496f0aadd86\
             054900016345785d8a00001961a8430009c4430005dc0040"
        );
    }

    #[test]
    fn record_roundtrip() {
        let tx = Transaction::from_record(&sample_record()).unwrap();
        assert_eq!(serde_json::to_value(tx.to_record()).unwrap(), sample_record());
    }

    #[test]
    fn json_key_order() {
        let tx = Transaction::from_record(&sample_record()).unwrap();
        assert_eq!(
            tx.to_json().unwrap(),
            "{\"To\":\"f01234\",\"From\":\"f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y\",\
             \"Nonce\":5,\"Value\":\"100000000000000000\",\"Params\":\"\",\
             \"GasFeeCap\":\"2500\",\"GasPremium\":\"1500\",\"GasLimit\":25000,\"Method\":0}"
        );
    }

    #[test]
    fn params_are_base64() {
        let tx = Transaction::from_record(&with("Params", json!("gUMA0gk="))).unwrap();
        assert_eq!(tx.params(), &[0x81, 0x43, 0x00, 0xd2, 0x09]);
        assert_eq!(tx.to_record().params, "gUMA0gk=");
    }

    #[test]
    fn missing_gas_limit_is_named() {
        let err = Transaction::from_record(&without("GasLimit")).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["GasLimit"]);
    }

    #[test]
    fn each_missing_key_is_reported() {
        for (key, _) in RECORD_SCHEMA {
            let err = Transaction::from_record(&without(key)).unwrap_err();
            assert_eq!(err.invalid_fields(), vec![key], "missing {key}");
        }
    }

    #[test]
    fn all_violations_are_aggregated() {
        let err = Transaction::from_record(&json!({ "To": "f01234", "Nonce": "5" })).unwrap_err();
        assert_eq!(
            err.invalid_fields(),
            vec!["From", "Nonce", "Value", "GasFeeCap", "GasPremium", "GasLimit", "Method", "Params"]
        );
    }

    #[test]
    fn mistyped_fields() {
        let cases = [
            ("To", json!(1234)),
            ("From", json!("")),
            ("Nonce", json!(-1)),
            ("Nonce", json!(1.5)),
            ("Value", json!("-1")),
            ("Value", json!("")),
            ("Value", json!(100)),
            ("GasFeeCap", json!(null)),
            ("GasLimit", json!("25000")),
            ("Method", json!(true)),
            ("Params", json!([])),
        ];
        for (key, value) in cases {
            let err = Transaction::from_record(&with(key, value.clone())).unwrap_err();
            assert_eq!(err.invalid_fields(), vec![key], "{key} = {value}");
        }
    }

    #[test]
    fn not_an_object() {
        assert!(matches!(
            Transaction::from_record(&json!([1, 2, 3])),
            Err(TransactionError::NotARecord)
        ));
    }

    #[test]
    fn bad_address_text() {
        let err = Transaction::from_record(&with("To", json!("x01234"))).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidAddress { field: "To", .. }));
    }

    #[test]
    fn bad_params() {
        let err = Transaction::from_record(&with("Params", json!("not base64!"))).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidParams(_)));
    }

    #[test]
    fn bad_amount_text() {
        let err = Transaction::from_record(&with("GasFeeCap", json!("12x"))).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::InvalidNumberFormat {
                field: "GasFeeCap",
                ..
            }
        ));
    }

    #[test]
    fn from_json_text() {
        let text = serde_json::to_string(&sample_record()).unwrap();
        let tx = Transaction::from_json(&text).unwrap();
        assert_eq!(tx.nonce(), 5);
        assert!(matches!(
            Transaction::from_json("{not json"),
            Err(TransactionError::Json(_))
        ));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let tx = Transaction::from_record(&with("Version", json!(0))).unwrap();
        assert_eq!(tx.version(), 0);
    }
}
