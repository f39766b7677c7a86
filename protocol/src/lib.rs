// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # filtx: Filecoin-style Message Codec
//!
//! The canonical wire form of a chain message and everything a wallet or
//! node needs around it: encode a transaction to the exact bytes that get
//! signed, decode those bytes back, and recover who signed them.
//!
//! Correctness here is bit-exact. One byte out of place in field order, big
//! number sign octet or digest input and every signature over the message
//! stops verifying.
//!
//! ## Architecture
//!
//! - **encoding**: the sign-octet big-number codec and a four-alphabet
//!   base32 codec. No protocol knowledge.
//! - **crypto**: blake2b digests, secp256k1 signing and recovery, and the
//!   typed signature container.
//! - **address**: network-prefixed, protocol-tagged addresses in text and
//!   binary form.
//! - **transaction**: the message itself, its CBOR and JSON forms, signing
//!   and signer recovery.
//! - **config**: protocol constants.
//!
//! ## Quick start
//!
//! ```
//! use filtx_protocol::address::Network;
//! use filtx_protocol::transaction::{verify_message, Transaction};
//!
//! let tx = Transaction::parse_hex(
//!     Network::Mainnet,
//!     "8a004300d209550155a94ceca23feab4d4a49b4426ec2496f0aadd86\
//!      054900016345785d8a00001961a8430009c4430005dc0040",
//! )
//! .unwrap();
//!
//! let signature = "k3fDEhRaWvuRG/nowGe89glMUzYDaHhQ31ArYSkLv15PqkN2FTUaFJQZa5oPXzyiH1F0C+aVfkQcnN5lMO8TuAE=";
//! let signer = verify_message(&tx, signature, None).unwrap();
//! assert_eq!(&signer, tx.from());
//! ```
//!
//! ## Conventions
//!
//! 1. Every fallible operation returns a module-specific error enum.
//! 2. Nothing is async and nothing does I/O; all calls are safe to run
//!    concurrently.
//! 3. The library logs through `tracing` and never installs a subscriber.

pub mod address;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod transaction;
