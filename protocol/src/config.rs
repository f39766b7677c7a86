//! # Protocol Configuration & Constants
//!
//! Every magic number of the message format lives here. These values are
//! consensus-critical: a single changed byte in the CID prefix or a different
//! checksum length produces signatures nobody on chain will accept.

// ---------------------------------------------------------------------------
// Crate Version
// ---------------------------------------------------------------------------

/// The library version string, reported by the CLI.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Network Prefixes
// ---------------------------------------------------------------------------

/// Leading character of every mainnet address (`f1...`, `f0...`).
pub const MAINNET_PREFIX: char = 'f';

/// Leading character of every testnet address (`t1...`, `t0...`).
pub const TESTNET_PREFIX: char = 't';

// ---------------------------------------------------------------------------
// Transaction Format
// ---------------------------------------------------------------------------

/// The only transaction version currently defined. Anything else on the
/// wire is rejected at decode time.
pub const TX_VERSION: u64 = 0;

/// Number of positional fields in the canonical CBOR array.
pub const TX_FIELD_COUNT: usize = 10;

/// Number of positional fields in a signed transaction envelope:
/// the message array and the signature bytes.
pub const SIGNED_TX_FIELD_COUNT: usize = 2;

/// Sign octet for non-negative big integers in the canonical byte form.
pub const SIGN_POSITIVE: u8 = 0x00;

/// Sign octet for negative big integers. Never valid for token amounts.
pub const SIGN_NEGATIVE: u8 = 0x01;

// ---------------------------------------------------------------------------
// Hashing & Digests
// ---------------------------------------------------------------------------

/// CIDv1 header for a dag-cbor block hashed with blake2b-256:
/// version (0x01), codec dag-cbor (0x71), multihash code 0xb220 as a
/// varint (0xa0 0xe4 0x02), digest length (0x20).
pub const CID_PREFIX: [u8; 6] = [0x01, 0x71, 0xa0, 0xe4, 0x02, 0x20];

/// Multibase prefix for lowercase, unpadded RFC4648 base32.
pub const MULTIBASE_BASE32: char = 'b';

/// Output length of the signing digest (blake2b-256).
pub const DIGEST_LENGTH: usize = 32;

/// Length of the hash payload carried by secp256k1 and actor addresses
/// (blake2b-160).
pub const PAYLOAD_HASH_LENGTH: usize = 20;

/// Length of the address checksum (blake2b-32).
pub const CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Keys & Signatures
// ---------------------------------------------------------------------------

/// BLS public keys are 48-byte compressed G1 points.
pub const BLS_PUBLIC_KEY_LENGTH: usize = 48;

/// SEC1 uncompressed secp256k1 public key: `0x04 || x || y`.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Compact `(r, s)` half of a recoverable signature.
pub const COMPACT_SIGNATURE_LENGTH: usize = 64;

/// `r || s || recovery_id`.
pub const SECP256K1_SIGNATURE_LENGTH: usize = COMPACT_SIGNATURE_LENGTH + 1;

/// Highest recovery id accepted by secp256k1 public-key recovery.
pub const MAX_RECOVERY_ID: u8 = 3;

/// Longest LEB128 encoding of a u64 (ceil(64 / 7)).
pub const MAX_VARINT_LENGTH: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_length_is_compact_plus_recovery_byte() {
        assert_eq!(SECP256K1_SIGNATURE_LENGTH, 65);
    }

    #[test]
    fn cid_prefix_declares_a_32_byte_digest() {
        assert_eq!(CID_PREFIX[5] as usize, DIGEST_LENGTH);
    }

    #[test]
    fn network_prefixes_differ() {
        assert_ne!(MAINNET_PREFIX, TESTNET_PREFIX);
    }
}
