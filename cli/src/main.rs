// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # filtx
//!
//! Entry point for the `filtx` binary. Parses CLI arguments, initializes
//! logging, runs one subcommand and prints its result to stdout.
//!
//! - `encode`: JSON record to canonical CBOR hex
//! - `decode`: canonical CBOR hex to JSON record
//! - `verify`: recover the signer address of a transaction or message
//! - `base32`: base32 encode / decode
//! - `version`: print build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Commands, FiltxCli};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "filtx=info,filtx_protocol=info";

fn main() -> Result<()> {
    let cli = FiltxCli::parse();
    logging::init_logging(DEFAULT_LOG_FILTER, cli.log_format);

    let output = match &cli.command {
        Commands::Encode(args) => commands::encode(args)?,
        Commands::Decode(args) => commands::decode(args)?,
        Commands::Verify(args) => commands::verify(args)?,
        Commands::Base32(command) => commands::base32(command)?,
        Commands::Version => commands::version(),
    };

    println!("{output}");
    Ok(())
}
