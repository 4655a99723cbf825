//! # Keys Subcommand
//!
//! Ed25519 key generation and account derivation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use vdx_crypto::Ed25519KeyPair;

/// Arguments for the keys subcommand.
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Write the generated key file (seed, public key, account) here.
    #[arg(long)]
    pub out: PathBuf,
}

/// On-disk key file format.
///
/// Contains the private seed — the file is for local operator use and must
/// be kept out of anything shared.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyFile {
    /// Hex-encoded 32-byte private seed.
    pub seed: String,
    /// Hex-encoded public key.
    pub public_key: String,
    /// Derived account identity.
    pub account_id: String,
}

impl KeyFile {
    /// Load a key file and rebuild the key pair from its seed.
    pub fn load(path: &Path) -> anyhow::Result<Ed25519KeyPair> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading key file {}", path.display()))?;
        let file: KeyFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing key file {}", path.display()))?;
        anyhow::ensure!(file.seed.len() == 64, "key file seed must be 32 bytes of hex");
        let bytes = (0..file.seed.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&file.seed[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .context("key file seed is not valid hex")?;
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        Ok(Ed25519KeyPair::from_seed(&seed))
    }
}

/// Generate a key pair and write it to the requested path.
pub fn run(args: KeysArgs) -> anyhow::Result<()> {
    let mut seed = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    let keypair = Ed25519KeyPair::from_seed(&seed);

    let file = KeyFile {
        seed: seed.iter().map(|b| format!("{b:02x}")).collect(),
        public_key: keypair.public_key().to_hex(),
        account_id: keypair.account_id().to_hex(),
    };
    std::fs::write(&args.out, serde_json::to_string_pretty(&file)?)
        .with_context(|| format!("writing key file {}", args.out.display()))?;
    tracing::info!(path = %args.out.display(), "key file written");
    println!("public_key: {}", file.public_key);
    println!("account_id: {}", file.account_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keygen_roundtrips_through_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("juror.json");
        run(KeysArgs { out: path.clone() }).unwrap();

        let keypair = KeyFile::load(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let file: KeyFile = serde_json::from_str(&raw).unwrap();
        assert_eq!(keypair.public_key().to_hex(), file.public_key);
        assert_eq!(keypair.account_id().to_hex(), file.account_id);
    }

    #[test]
    fn load_rejects_short_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"seed": "abcd", "public_key": "", "account_id": ""}"#,
        )
        .unwrap();
        assert!(KeyFile::load(&path).is_err());
    }
}
