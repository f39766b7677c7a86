//! Subcommand handlers. Each returns the text printed to stdout.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use filtx_protocol::address::Network;
use filtx_protocol::crypto::Signature;
use filtx_protocol::encoding::base32;
use filtx_protocol::transaction::{
    verify_message, SignedTransaction, Transaction, TransactionRecord,
};

use crate::cli::{
    Base32Command, Base32DecodeArgs, Base32EncodeArgs, DecodeArgs, EncodeArgs, VerifyArgs,
};

/// Resolves an input argument: `-` reads stdin, an existing path is read
/// from disk, anything else is the literal value.
pub fn read_input(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    let path = Path::new(arg);
    if path.is_file() {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    Ok(arg.to_string())
}

pub fn encode(args: &EncodeArgs) -> Result<String> {
    let json = read_input(&args.input)?;
    let tx = Transaction::from_json(&json).context("invalid transaction record")?;
    let bytes = tx.serialize()?;
    tracing::info!(bytes = bytes.len(), nonce = tx.nonce(), "encoded transaction");
    Ok(hex::encode(bytes))
}

#[derive(Serialize)]
struct DecodedMessage {
    #[serde(flatten)]
    record: TransactionRecord,
    #[serde(rename = "CID")]
    cid: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DecodedSignedMessage {
    message: TransactionRecord,
    signature: Signature,
    #[serde(rename = "CID")]
    cid: String,
}

pub fn decode(args: &DecodeArgs) -> Result<String> {
    let input = read_input(&args.input)?;

    let output = if args.signed {
        let signed = SignedTransaction::parse_hex(args.network, &input)
            .context("invalid signed transaction encoding")?;
        let cid = signed.cid()?;
        tracing::info!(%cid, network = %args.network, "decoded signed transaction");
        let (message, signature) = signed.into_parts();
        serde_json::to_string_pretty(&DecodedSignedMessage {
            message: message.to_record(),
            signature,
            cid,
        })?
    } else {
        let tx = Transaction::parse_hex(args.network, &input)
            .context("invalid transaction encoding")?;
        let cid = tx.cid()?;
        tracing::info!(%cid, network = %args.network, "decoded transaction");
        serde_json::to_string_pretty(&DecodedMessage {
            record: tx.to_record(),
            cid,
        })?
    };
    Ok(output)
}

pub fn verify(args: &VerifyArgs) -> Result<String> {
    let signer = match (&args.tx_json, &args.message) {
        (Some(tx_json), _) => {
            let json = read_input(tx_json)?;
            let tx = Transaction::from_json(&json).context("invalid transaction record")?;
            verify_message(&tx, &args.signature, args.network)?
        }
        (None, Some(message)) => verify_message(message.as_str(), &args.signature, args.network)?,
        (None, None) => anyhow::bail!("either --tx-json or --message is required"),
    };
    tracing::info!(%signer, "signature verified");
    Ok(signer.to_string())
}

pub fn base32(command: &Base32Command) -> Result<String> {
    match command {
        Base32Command::Encode(args) => base32_encode(args),
        Base32Command::Decode(args) => base32_decode(args),
    }
}

fn base32_encode(args: &Base32EncodeArgs) -> Result<String> {
    let bytes = hex::decode(args.input.trim()).context("input must be hex")?;
    Ok(base32::encode(&bytes, args.variant, args.padding))
}

fn base32_decode(args: &Base32DecodeArgs) -> Result<String> {
    let bytes = base32::decode(args.input.trim(), args.variant)?;
    Ok(hex::encode(bytes))
}

pub fn version() -> String {
    format!(
        "filtx {}\nprotocol {}\ntx format v{}",
        env!("CARGO_PKG_VERSION"),
        filtx_protocol::config::PROTOCOL_VERSION,
        filtx_protocol::config::TX_VERSION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtx_protocol::encoding::Base32Variant;
    use std::io::Write;

    const SAMPLE_JSON: &str = r#"{
        "To": "f01234",
        "From": "f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y",
        "Nonce": 5,
        "Value": "100000000000000000",
        "Params": "",
        "GasFeeCap": "2500",
        "GasPremium": "1500",
        "GasLimit": 25000,
        "Method": 0
    }"#;
    const SAMPLE_CBOR: &str = "8a004300d209550155a94ceca23feab4d4a49b4426ec2496f0aadd86\
                               054900016345785d8a00001961a8430009c4430005dc0040";
    const TX_SIGNATURE: &str =
        "k3fDEhRaWvuRG/nowGe89glMUzYDaHhQ31ArYSkLv15PqkN2FTUaFJQZa5oPXzyiH1F0C+aVfkQcnN5lMO8TuAE=";

    #[test]
    fn encode_inline_json() {
        let out = encode(&EncodeArgs {
            input: SAMPLE_JSON.to_string(),
        })
        .unwrap();
        assert_eq!(out, SAMPLE_CBOR);
    }

    #[test]
    fn encode_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_JSON.as_bytes()).unwrap();
        let out = encode(&EncodeArgs {
            input: file.path().display().to_string(),
        })
        .unwrap();
        assert_eq!(out, SAMPLE_CBOR);
    }

    #[test]
    fn encode_reports_missing_fields() {
        let err = encode(&EncodeArgs {
            input: r#"{"To": "f01234"}"#.to_string(),
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("'GasLimit' is a required field"));
    }

    #[test]
    fn decode_prints_record_and_cid() {
        let out = decode(&DecodeArgs {
            input: SAMPLE_CBOR.to_string(),
            network: Network::Testnet,
            signed: false,
        })
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["From"], "t1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y");
        assert_eq!(json["GasLimit"], 25000);
        assert_eq!(
            json["CID"],
            "bafy2bzacedbujaggn7nr35dil33lpjvkvoz5ibs52xosy554rrddbsawfutwi"
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(&DecodeArgs {
            input: "not hex".to_string(),
            network: Network::Mainnet,
            signed: false,
        })
        .is_err());
    }

    #[test]
    fn verify_transaction_json() {
        let out = verify(&VerifyArgs {
            signature: TX_SIGNATURE.to_string(),
            tx_json: Some(SAMPLE_JSON.to_string()),
            message: None,
            network: None,
        })
        .unwrap();
        assert_eq!(out, "f1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y");
    }

    #[test]
    fn verify_raw_message() {
        let out = verify(&VerifyArgs {
            signature: "xtb+u2rjlzuBHwXPXz1Bz4CJa2e2VDk7NdlFHh4I6isatbHTAXfaHhHS/Khb5DiiGSCK5mY1A9cGCCY6X6RdNQE="
                .to_string(),
            tx_json: None,
            message: Some("hello filecoin".to_string()),
            network: Some(Network::Testnet),
        })
        .unwrap();
        assert_eq!(out, "t1kwuuz3fch7vljvfetnccn3bes3ykvxmgpueh57y");
    }

    #[test]
    fn base32_roundtrip_through_commands() {
        let encoded = base32(&Base32Command::Encode(Base32EncodeArgs {
            input: "f83e7f83".to_string(),
            variant: Base32Variant::Rfc4648,
            padding: None,
        }))
        .unwrap();
        assert_eq!(encoded, "7A7H7AY=");

        let decoded = base32(&Base32Command::Decode(Base32DecodeArgs {
            input: encoded,
            variant: Base32Variant::Rfc4648,
        }))
        .unwrap();
        assert_eq!(decoded, "f83e7f83");
    }

    #[test]
    fn version_names_tx_format() {
        assert!(version().contains("tx format v0"));
    }
}
