//! Transaction signing with secp256k1 keys.
//!
//! Signing is a separate step from building because the key may not be
//! available at construction time (hardware wallet, remote signer). What gets
//! signed is always [`get_digest`] of the canonical bytes, never the bytes
//! themselves.

use tracing::debug;

use super::builder::Transaction;
use super::error::TransactionError;
use super::signed::SignedTransaction;
use crate::crypto::hash::get_digest;
use crate::crypto::keys::SecpKeypair;
use crate::crypto::signatures::Signature;

/// Signs an arbitrary message. The result verifies with
/// [`super::verify_message`] given the same bytes.
pub fn sign_bytes(keypair: &SecpKeypair, message: &[u8]) -> Signature {
    let digest = get_digest(message);
    Signature::secp256k1(keypair.sign_digest(&digest))
}

/// Signs the canonical encoding of `tx`.
///
/// The caller is responsible for `keypair` matching `tx.from()`;
/// [`SignedTransaction::verify`] is where a mismatch shows up.
///
/// # Example
///
/// ```
/// use filtx_protocol::address::{Address, Network};
/// use filtx_protocol::crypto::SecpKeypair;
/// use filtx_protocol::transaction::{sign_transaction, TransactionBuilder};
///
/// let keypair = SecpKeypair::from_bytes(&[7u8; 32]).unwrap();
/// let from = Address::new_secp256k1(Network::Mainnet, &keypair.public_key_uncompressed()).unwrap();
/// let tx = TransactionBuilder::new(Address::new_id(Network::Mainnet, 1234), from)
///     .value("1000")
///     .build()
///     .unwrap();
///
/// let signed = sign_transaction(tx, &keypair).unwrap();
/// assert!(signed.verify().is_ok());
/// ```
pub fn sign_transaction(
    tx: Transaction,
    keypair: &SecpKeypair,
) -> Result<SignedTransaction, TransactionError> {
    let signature = sign_bytes(keypair, &tx.serialize()?);
    debug!(nonce = tx.nonce(), "signed transaction");
    Ok(SignedTransaction::new(tx, signature))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
