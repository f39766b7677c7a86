//! # secp256k1 Keys
//!
//! The thin layer over `secp256k1` that the rest of the crate signs and
//! recovers through. Everything works on prehashed 32-byte digests; callers
//! compute the digest with [`super::hash::get_digest`] first.
//!
//! ## Security considerations
//!
//! - This module never generates keys. Callers bring their own secret bytes.
//! - Key bytes are never logged and `SecpKeypair` has no `Debug` output for
//!   the secret half.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use std::fmt;
use thiserror::Error;

use crate::config::{
    COMPACT_SIGNATURE_LENGTH, DIGEST_LENGTH, SECP256K1_SIGNATURE_LENGTH,
    UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

/// Errors that can occur during key operations.
///
/// Messages never include key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: not a valid secp256k1 scalar")]
    InvalidSecretKey,

    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    #[error("invalid compact signature")]
    InvalidSignature,

    #[error("invalid message digest")]
    InvalidDigest,

    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// A secp256k1 signing key.
pub struct SecpKeypair {
    secret_key: SecretKey,
}

impl SecpKeypair {
    /// Constructs a keypair from 32 secret bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { secret_key })
    }

    /// Constructs a keypair from hex-encoded secret bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&array)
    }

    /// SEC1 uncompressed public key (`0x04 || x || y`).
    pub fn public_key_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        PublicKey::from_secret_key(SECP256K1, &self.secret_key).serialize_uncompressed()
    }

    /// Signs a 32-byte digest, returning `r || s || recovery_id`.
    ///
    /// Nonces are derived per RFC 6979, so the output is deterministic.
    pub fn sign_digest(&self, digest: &[u8; DIGEST_LENGTH]) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        let message = Message::from_digest(*digest);
        let signature = SECP256K1.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, compact) = signature.serialize_compact();

        let mut out = [0u8; SECP256K1_SIGNATURE_LENGTH];
        out[..COMPACT_SIGNATURE_LENGTH].copy_from_slice(&compact);
        // Recovery ids are 0..=3.
        out[COMPACT_SIGNATURE_LENGTH] = recovery_id.to_i32() as u8;
        out
    }
}

impl fmt::Debug for SecpKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecpKeypair")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Recovers the uncompressed public key that produced `compact` over `digest`.
pub fn recover_public_key(
    digest: &[u8],
    compact: &[u8; COMPACT_SIGNATURE_LENGTH],
    recovery_id: u8,
) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH], KeyError> {
    let message = Message::from_digest_slice(digest).map_err(|_| KeyError::InvalidDigest)?;
    let rec_id = RecoveryId::from_i32(i32::from(recovery_id))
        .map_err(|_| KeyError::InvalidRecoveryId(recovery_id))?;
    let signature = RecoverableSignature::from_compact(compact, rec_id)
        .map_err(|_| KeyError::InvalidSignature)?;

    let public_key = SECP256K1
        .recover_ecdsa(&message, &signature)
        .map_err(|_| KeyError::RecoveryFailed)?;

    Ok(public_key.serialize_uncompressed())
}
