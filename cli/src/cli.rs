//! # CLI Interface
//!
//! Defines the command-line argument structure for `filtx` using `clap`
//! derive. Subcommands: `encode`, `decode`, `verify`, `base32` and
//! `version`.

use clap::{ArgAction, Args, Parser, Subcommand};

use filtx_protocol::address::Network;
use filtx_protocol::encoding::Base32Variant;

use crate::logging::LogFormat;

/// Filecoin-style message codec.
///
/// Encodes JSON transaction records to canonical CBOR, decodes CBOR back to
/// JSON, recovers signer addresses and runs the base32 codec.
#[derive(Parser, Debug)]
#[command(name = "filtx", about = "Filecoin-style message codec", version, propagate_version = true)]
pub struct FiltxCli {
    /// Log output format: pretty or json. Logs go to stderr.
    #[arg(long, global = true, env = "FILTX_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a JSON transaction record as canonical CBOR hex.
    Encode(EncodeArgs),
    /// Decode canonical CBOR hex into a JSON transaction record.
    Decode(DecodeArgs),
    /// Recover the address that signed a transaction or message.
    Verify(VerifyArgs),
    /// Base32 encode or decode.
    #[command(subcommand)]
    Base32(Base32Command),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON record: inline text, a file path, or `-` for stdin.
    pub input: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// CBOR as hex: inline text, a file path, or `-` for stdin.
    pub input: String,

    /// Network the decoded addresses are rendered for: mainnet or testnet.
    #[arg(long, env = "FILTX_NETWORK", default_value = "mainnet")]
    pub network: Network,

    /// Input is a signed transaction (`[message, signature]`).
    #[arg(long)]
    pub signed: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Base64 of the 65-byte secp256k1 signature.
    pub signature: String,

    /// The signed transaction as a JSON record (inline, path or `-`).
    #[arg(long, conflicts_with = "message", required_unless_present = "message")]
    pub tx_json: Option<String>,

    /// The signed raw message text.
    #[arg(long)]
    pub message: Option<String>,

    /// Network the signer address is rendered for. Defaults to mainnet.
    #[arg(long, env = "FILTX_NETWORK")]
    pub network: Option<Network>,
}

#[derive(Subcommand, Debug)]
pub enum Base32Command {
    /// Encode hex input as base32.
    Encode(Base32EncodeArgs),
    /// Decode base32 text; prints hex.
    Decode(Base32DecodeArgs),
}

#[derive(Args, Debug)]
pub struct Base32EncodeArgs {
    /// Hex-encoded bytes.
    pub input: String,

    /// Alphabet: RFC3548, RFC4648, RFC4648-HEX or Crockford.
    #[arg(long, default_value = "RFC4648")]
    pub variant: Base32Variant,

    /// Force padding on or off. Defaults to the alphabet's convention.
    #[arg(long, action = ArgAction::Set)]
    pub padding: Option<bool>,
}

#[derive(Args, Debug)]
pub struct Base32DecodeArgs {
    /// Base32 text.
    pub input: String,

    /// Alphabet: RFC3548, RFC4648, RFC4648-HEX or Crockford.
    #[arg(long, default_value = "RFC4648")]
    pub variant: Base32Variant,
}
