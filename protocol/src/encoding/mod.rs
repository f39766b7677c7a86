//! # Encodings
//!
//! Text and byte codecs with no knowledge of transactions:
//!
//! - **base32**: the four-variant base32 codec used for addresses and CIDs.
//! - **bignum**: sign-octet / big-endian-magnitude integers used for token
//!   amounts on the wire.

pub mod base32;
pub mod bignum;

pub use base32::{Base32Error, Base32Variant};
pub use bignum::BigNumError;
