//! # Transaction Module
//!
//! Construction, canonical encoding, signing and signer recovery for
//! outbound chain messages. Every value transfer and actor method call is a
//! [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs        TokenAmount, the non-negative big-integer amount type
//! builder.rs      Transaction and the fluent TransactionBuilder
//! codec.rs        canonical CBOR serialize / parse, message CID
//! record.rs       the flat JSON text record and its schema
//! signing.rs      secp256k1 signing over the message digest
//! signed.rs       SignedTransaction, the message + signature pair
//! verification.rs signer address recovery
//! error.rs        TransactionError and record field violations
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] or [`Transaction::from_record`].
//! 2. **Encode**: [`Transaction::serialize`] gives the canonical bytes.
//! 3. **Sign**: [`sign_transaction`] hashes those bytes with
//!    [`crate::crypto::get_digest`] and signs the digest.
//! 4. **Verify**: [`verify_message`] recovers the signer's address.
//!
//! ## Design Decisions
//!
//! - Amounts are [`TokenAmount`] (a `BigUint`), so a negative amount is not
//!   representable after construction.
//! - Params stay raw bytes inside the crate; base64 appears only in the JSON
//!   record.
//! - Parsing takes the network explicitly because the binary address form
//!   has no network tag.

pub mod builder;
pub mod codec;
pub mod error;
pub mod record;
pub mod signed;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use error::{FieldKind, FieldViolation, TransactionError};
pub use record::{TransactionRecord, RECORD_SCHEMA};
pub use signed::SignedTransaction;
pub use signing::{sign_bytes, sign_transaction};
pub use types::TokenAmount;
pub use verification::{recover_signer, verify_message, VerifiableMessage, VerifyError};
