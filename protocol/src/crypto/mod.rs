//! # Cryptographic Primitives
//!
//! Everything signature-related flows through here:
//!
//! - **hash**: BLAKE2b at the three output lengths the format uses, plus the
//!   CID-wrapped signing digest.
//! - **keys**: secp256k1 signing and public-key recovery.
//! - **signatures**: the typed `{Type, Data}` signature container.
//!
//! Nothing here is hand-rolled. The curve math is `secp256k1` (libsecp256k1)
//! and the hashes are `blake2`.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake2b_160, blake2b_256, checksum, get_digest, get_payload_secp256k1};
pub use keys::{recover_public_key, KeyError, SecpKeypair};
pub use signatures::{Signature, SignatureError, SignatureType};
