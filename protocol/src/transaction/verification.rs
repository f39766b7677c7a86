//! Signer recovery: from a message and a detached signature to the address
//! that signed it.
//!
//! Steps, in order:
//!
//! 1. **Bytes**: a [`Transaction`] is serialized canonically; raw messages
//!    are used as-is.
//! 2. **Digest**: [`get_digest`] over those bytes.
//! 3. **Signature**: base64 → 65 bytes → compact `(r, s)` + recovery id.
//! 4. **Recovery**: secp256k1 public key recovery over the digest.
//! 5. **Address**: payload of the recovered key, rendered under the
//!    requested network (mainnet when none is given).
//!
//! Nothing here ever guesses. Any failure in steps 3 and 4 is a
//! [`VerifyError::SignatureRecoveryFailed`].

use thiserror::Error;
use tracing::{debug, trace};

use super::builder::Transaction;
use super::error::TransactionError;
use crate::address::{Address, Network};
use crate::crypto::hash::get_digest;
use crate::crypto::keys::recover_public_key;
use crate::crypto::signatures::{Signature, SignatureType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The signature could not be decoded or did not yield a public key.
    #[error("signature recovery failed: {reason}")]
    SignatureRecoveryFailed { reason: String },

    /// The transaction could not be serialized for hashing.
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] TransactionError),

    /// The recovered signer is not the transaction's sender.
    #[error("signer mismatch: message is from {expected}, signature recovers to {recovered}")]
    SignerMismatch { expected: Address, recovered: Address },
}

impl VerifyError {
    fn recovery(reason: impl ToString) -> Self {
        Self::SignatureRecoveryFailed {
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Message input
// ---------------------------------------------------------------------------

/// Something that can be verified: a transaction or raw bytes.
#[derive(Debug, Clone, Copy)]
pub enum VerifiableMessage<'a> {
    Transaction(&'a Transaction),
    Raw(&'a [u8]),
}

impl VerifiableMessage<'_> {
    /// The exact bytes that were signed.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        match self {
            Self::Transaction(tx) => tx.serialize(),
            Self::Raw(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl<'a> From<&'a Transaction> for VerifiableMessage<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self::Transaction(tx)
    }
}

impl<'a> From<&'a [u8]> for VerifiableMessage<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Raw(bytes)
    }
}

impl<'a> From<&'a str> for VerifiableMessage<'a> {
    fn from(text: &'a str) -> Self {
        Self::Raw(text.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Recovers the address that produced `signature` over `message`.
///
/// `signature` is the base64 of the 65-byte secp256k1 signature
/// (`r || s || recovery_id`). The address is rendered under `network`,
/// defaulting to mainnet.
///
/// # Example
///
/// ```
/// use filtx_protocol::transaction::verify_message;
///
/// let signature = "xtb+u2rjlzuBHwXPXz1Bz4CJa2e2VDk7NdlFHh4I6isatbHTAXfaHhHS/Khb5DiiGSCK5mY1A9cGCCY6X6RdNQE=";
/// let signer = verify_message("hello filecoin", signature, None).unwrap();
/// assert_eq!(signer.to_string(), "f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y");
/// ```
///
/// # Errors
///
/// - [`VerifyError::Serialize`] if a transaction cannot be encoded.
/// - [`VerifyError::SignatureRecoveryFailed`] for bad base64, wrong length,
///   out-of-range recovery id, or a curve recovery failure.
pub fn verify_message<'a>(
    message: impl Into<VerifiableMessage<'a>>,
    signature: &str,
    network: Option<Network>,
) -> Result<Address, VerifyError> {
    let signature = Signature::from_base64(SignatureType::Secp256k1, signature)
        .map_err(VerifyError::recovery)?;
    recover_signer(message.into(), &signature, network.unwrap_or_default())
}

/// [`verify_message`] for an already-decoded signature container.
pub fn recover_signer(
    message: VerifiableMessage<'_>,
    signature: &Signature,
    network: Network,
) -> Result<Address, VerifyError> {
    let bytes = message.signing_bytes()?;
    let digest = get_digest(&bytes);
    trace!(digest = %hex::encode(digest), "computed signing digest");

    let (compact, recovery_id) = signature.secp256k1_parts().map_err(VerifyError::recovery)?;
    let public_key =
        recover_public_key(&digest, &compact, recovery_id).map_err(VerifyError::recovery)?;

    let signer = Address::new_secp256k1(network, &public_key).map_err(VerifyError::recovery)?;
    debug!(%signer, "recovered signer");
    Ok(signer)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
