//! # Evidence Subcommands
//!
//! Envelope hashing plus attestation signing and structural checking for
//! evidence providers. Registry-backed trust decisions belong to the
//! engine; the `check` here validates signature, encoding, and expiry so a
//! provider can confirm an attestation before submitting it.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use serde::Serialize;

use vdx_core::{ClaimId, ContentDigest, RoundIndex, SystemClock, Timestamp};
use vdx_core::Clock;
use vdx_crypto::ed25519::{verify, verify_digest, Ed25519Signature};
use vdx_engine::evidence::{legacy_message_digest, typed_message_bytes};
use vdx_engine::{EngineDomain, EvidenceAttestation, EvidenceEncoding, EvidenceEnvelope, EvidenceKind};

use crate::keys::KeyFile;

/// Arguments for the evidence subcommand.
#[derive(Args, Debug)]
pub struct EvidenceArgs {
    /// Evidence operation to perform.
    #[command(subcommand)]
    pub operation: EvidenceOperation,
}

/// Evidence operations.
#[derive(Subcommand, Debug)]
pub enum EvidenceOperation {
    /// Build an envelope around a blob and print its content hash.
    Envelope(EnvelopeArgs),
    /// Sign an attestation with a key file.
    Sign(SignArgs),
    /// Check an attestation's signature, encoding, and expiry.
    Check(CheckArgs),
}

/// Arguments for envelope hashing.
#[derive(Args, Debug)]
pub struct EnvelopeArgs {
    /// Path to the raw evidence blob.
    #[arg(long)]
    pub file: PathBuf,
    /// URI where the blob is published.
    #[arg(long)]
    pub uri: String,
    /// The verdict the evidence supports.
    #[arg(long)]
    pub verdict: bool,
    /// Round index the envelope is prepared for.
    #[arg(long)]
    pub round: u32,
    /// Expiry timestamp (RFC 3339 with Z suffix).
    #[arg(long)]
    pub expires_at: String,
}

/// Arguments for attestation signing.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Key file produced by `vdx keys`.
    #[arg(long)]
    pub key: PathBuf,
    /// Claim identifier.
    #[arg(long)]
    pub claim: u64,
    /// Round index.
    #[arg(long)]
    pub round: u32,
    /// Evidence kind (police, oracle, expert, community, ...).
    #[arg(long)]
    pub kind: String,
    /// Envelope content hash (64 hex chars).
    #[arg(long)]
    pub content_hash: String,
    /// The attested verdict.
    #[arg(long)]
    pub verdict: bool,
    /// Evidence URI.
    #[arg(long)]
    pub uri: String,
    /// Expiry timestamp (RFC 3339 with Z suffix).
    #[arg(long)]
    pub expires_at: String,
    /// Sign under the typed, domain-separated scheme instead of the legacy
    /// flat digest.
    #[arg(long)]
    pub typed: bool,
    /// Engine instance id for the typed scheme.
    #[arg(long, default_value = "veridex-local")]
    pub instance: String,
    /// Network id for the typed scheme.
    #[arg(long, default_value_t = 1)]
    pub network_id: u64,
}

/// Arguments for attestation checking.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the attestation JSON.
    #[arg(long)]
    pub file: PathBuf,
    /// The attestation uses the typed scheme.
    #[arg(long)]
    pub typed: bool,
    /// Engine instance id for the typed scheme.
    #[arg(long, default_value = "veridex-local")]
    pub instance: String,
    /// Network id for the typed scheme.
    #[arg(long, default_value_t = 1)]
    pub network_id: u64,
}

#[derive(Debug, Serialize)]
struct EnvelopeOutput {
    content_hash: String,
    envelope: EvidenceEnvelope,
}

/// Dispatch an evidence operation.
pub fn run(args: EvidenceArgs) -> anyhow::Result<()> {
    match args.operation {
        EvidenceOperation::Envelope(args) => envelope(args),
        EvidenceOperation::Sign(args) => sign(args),
        EvidenceOperation::Check(args) => check(args),
    }
}

fn envelope(args: EnvelopeArgs) -> anyhow::Result<()> {
    let blob = std::fs::read(&args.file)
        .with_context(|| format!("reading evidence blob {}", args.file.display()))?;
    let expires_at = Timestamp::parse(&args.expires_at)?;
    let envelope =
        EvidenceEnvelope::for_blob(args.uri, &blob, args.verdict, RoundIndex(args.round), expires_at);
    let output = EnvelopeOutput {
        content_hash: envelope.content_hash()?.to_hex(),
        envelope,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn sign(args: SignArgs) -> anyhow::Result<()> {
    let keypair = KeyFile::load(&args.key)?;
    let mut attestation = EvidenceAttestation {
        claim_id: ClaimId(args.claim),
        round_index: RoundIndex(args.round),
        kind: EvidenceKind::parse(&args.kind),
        content_hash: ContentDigest::from_hex(&args.content_hash)?,
        verdict: args.verdict,
        uri: args.uri,
        expires_at: Timestamp::parse(&args.expires_at)?,
        public_key: keypair.public_key(),
        signature: Ed25519Signature::from_bytes([0u8; 64]),
    };
    attestation.signature = if args.typed {
        let domain = EngineDomain::new(args.instance, args.network_id);
        let bytes = typed_message_bytes(&domain, &attestation)?;
        keypair.sign(&bytes)
    } else {
        let digest = legacy_message_digest(
            attestation.claim_id,
            attestation.round_index,
            &attestation.kind,
            &attestation.content_hash,
            attestation.verdict,
            &attestation.uri,
            attestation.expires_at,
        );
        keypair.sign_digest(&digest)
    };
    println!("{}", serde_json::to_string_pretty(&attestation)?);
    Ok(())
}

fn check(args: CheckArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading attestation {}", args.file.display()))?;
    let attestation: EvidenceAttestation = serde_json::from_str(&raw)?;

    let encoding = if args.typed {
        EvidenceEncoding::TypedDomain
    } else {
        EvidenceEncoding::LegacyFlat
    };
    match encoding {
        EvidenceEncoding::LegacyFlat => {
            let digest = legacy_message_digest(
                attestation.claim_id,
                attestation.round_index,
                &attestation.kind,
                &attestation.content_hash,
                attestation.verdict,
                &attestation.uri,
                attestation.expires_at,
            );
            verify_digest(&digest, &attestation.signature, &attestation.public_key)?;
        }
        EvidenceEncoding::TypedDomain => {
            let domain = EngineDomain::new(args.instance, args.network_id);
            let bytes = typed_message_bytes(&domain, &attestation)?;
            verify(&bytes, &attestation.signature, &attestation.public_key)?;
        }
    }

    let now = SystemClock.now();
    anyhow::ensure!(
        attestation.expires_at >= now,
        "attestation expired at {}",
        attestation.expires_at
    );
    println!("signature ok");
    println!("signer: {}", attestation.public_key.account_id().to_hex());
    println!("expires_at: {}", attestation.expires_at);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdx_crypto::Ed25519KeyPair;

    #[test]
    fn signed_attestation_passes_check_logic() {
        let keypair = Ed25519KeyPair::from_seed(&[5u8; 32]);
        let mut attestation = EvidenceAttestation {
            claim_id: ClaimId(0),
            round_index: RoundIndex(0),
            kind: EvidenceKind::Police,
            content_hash: vdx_crypto::sha256_blob(b"report"),
            verdict: true,
            uri: "ipfs://x".to_string(),
            expires_at: Timestamp::parse("2030-01-01T00:00:00Z").unwrap(),
            public_key: keypair.public_key(),
            signature: Ed25519Signature::from_bytes([0u8; 64]),
        };
        let digest = legacy_message_digest(
            attestation.claim_id,
            attestation.round_index,
            &attestation.kind,
            &attestation.content_hash,
            attestation.verdict,
            &attestation.uri,
            attestation.expires_at,
        );
        attestation.signature = keypair.sign_digest(&digest);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attestation.json");
        std::fs::write(&path, serde_json::to_string(&attestation).unwrap()).unwrap();
        check(CheckArgs {
            file: path,
            typed: false,
            instance: "veridex-local".to_string(),
            network_id: 1,
        })
        .unwrap();
    }

    #[test]
    fn envelope_command_hashes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let blob_path = dir.path().join("report.bin");
        std::fs::write(&blob_path, b"scanned report").unwrap();
        envelope(EnvelopeArgs {
            file: blob_path,
            uri: "ipfs://bafy".to_string(),
            verdict: true,
            round: 0,
            expires_at: "2030-01-01T00:00:00Z".to_string(),
        })
        .unwrap();
    }
}
