//! # Hashing Utilities
//!
//! Every hash in the message format is a BLAKE2b instance at a different
//! output length:
//!
//! - **blake2b-256**: message CIDs and the signing digest.
//! - **blake2b-160**: the payload of secp256k1 and actor addresses.
//! - **blake2b-32**: the address checksum.
//!
//! These are not interchangeable truncations: BLAKE2b mixes the output length
//! into its parameter block, so `blake2b_160(x)` is not a prefix of
//! `blake2b_256(x)`.
//!
//! ## The signing digest
//!
//! Signatures are not taken over the raw CBOR. The signer first wraps the
//! bytes in a CID (`CID_PREFIX || blake2b_256(cbor)`) and then hashes the CID
//! bytes again:
//!
//! ```text
//! cbor -> blake2b_256 -> prepend CID_PREFIX -> blake2b_256 -> digest
//! ```

use blake2::digest::consts::{U20, U32, U4};
use blake2::{Blake2b, Digest};

use crate::config::{CHECKSUM_LENGTH, CID_PREFIX, DIGEST_LENGTH, PAYLOAD_HASH_LENGTH};

type Blake2b256 = Blake2b<U32>;
type Blake2b160 = Blake2b<U20>;
type Blake2b32 = Blake2b<U4>;

/// Compute the BLAKE2b-256 hash of the input data.
pub fn blake2b_256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    Blake2b256::digest(data).into()
}

/// Compute the BLAKE2b-160 hash of the input data.
pub fn blake2b_160(data: &[u8]) -> [u8; PAYLOAD_HASH_LENGTH] {
    Blake2b160::digest(data).into()
}

/// Compute the 4-byte BLAKE2b address checksum.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    Blake2b32::digest(data).into()
}

/// Binary CID of a dag-cbor block: `CID_PREFIX || blake2b_256(data)`.
pub fn message_cid_bytes(data: &[u8]) -> Vec<u8> {
    let mut cid = Vec::with_capacity(CID_PREFIX.len() + DIGEST_LENGTH);
    cid.extend_from_slice(&CID_PREFIX);
    cid.extend_from_slice(&blake2b_256(data));
    cid
}

/// The 32-byte digest a secp256k1 signature is computed over.
///
/// # Example
///
/// ```
/// use filtx_protocol::crypto::get_digest;
///
/// let digest = get_digest(b"hello filecoin");
/// assert_eq!(
///     hex::encode(digest),
///     "30de40e0981caf3a95982c1382a2bb080bf7a2d0774e27c3797cbb947c4666ad"
/// );
/// ```
pub fn get_digest(message: &[u8]) -> [u8; DIGEST_LENGTH] {
    blake2b_256(&message_cid_bytes(message))
}

/// Address payload for a secp256k1 key: BLAKE2b-160 of the 65-byte
/// uncompressed public key.
pub fn get_payload_secp256k1(uncompressed_public_key: &[u8]) -> [u8; PAYLOAD_HASH_LENGTH] {
    blake2b_160(uncompressed_public_key)
}
