//! # Evidence Attestations and Verification
//!
//! Third-party evidence enters the engine as a signed attestation over a
//! content hash. The verifier accepts two message encodings:
//!
//! 1. **Legacy flat digest** — SHA-256 over the fixed-order concatenation of
//!    the attestation fields, signed directly. Kept for providers that
//!    predate the typed scheme.
//! 2. **Typed, domain-separated** — canonical JCS bytes of a structure that
//!    binds an [`EngineDomain`] block (engine name, version, instance,
//!    network) to the message fields. A typed attestation for one engine
//!    instance cannot be replayed against another.
//!
//! Verified evidence is advisory input for jurors; it never enters tally
//! math.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vdx_core::{
    sha256_digest, AccountId, CanonicalBytes, ClaimId, ContentDigest, RoundIndex, Timestamp,
};
use vdx_crypto::ed25519::{verify, verify_digest, Ed25519PublicKey, Ed25519Signature};
use vdx_crypto::sha256_blob;

use crate::error::EngineError;
use crate::registry::{EvidenceKind, ProviderRegistry};

/// Identity block binding typed attestations to one engine deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDomain {
    /// Engine family name.
    pub name: String,
    /// Message format version.
    pub version: String,
    /// Unique identifier of this engine instance.
    pub instance: String,
    /// Network the instance serves.
    pub network_id: u64,
}

impl EngineDomain {
    /// Create a domain block for an engine instance.
    pub fn new(instance: impl Into<String>, network_id: u64) -> Self {
        Self {
            name: "veridex-dispute-engine".to_string(),
            version: "2".to_string(),
            instance: instance.into(),
            network_id,
        }
    }
}

/// A signed third-party statement about a claim's veracity.
///
/// Identified by `(claim_id, round_index, signer, kind)` — one attestation
/// per provider per kind per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceAttestation {
    /// The claim the evidence concerns.
    pub claim_id: ClaimId,
    /// The round the evidence concerns.
    pub round_index: RoundIndex,
    /// Category of evidence.
    pub kind: EvidenceKind,
    /// SHA-256 of the off-chain evidence envelope.
    pub content_hash: ContentDigest,
    /// The verdict the provider attests to.
    pub verdict: bool,
    /// Location of the off-chain evidence (e.g. `ipfs://...`).
    pub uri: String,
    /// When the attestation stops being acceptable.
    pub expires_at: Timestamp,
    /// The attesting key.
    pub public_key: Ed25519PublicKey,
    /// Signature over the encoded message.
    pub signature: Ed25519Signature,
}

/// How the verifier established trust in the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignerTrust {
    /// The signer is the configured oracle key.
    OracleSigner,
    /// The signer is approved in the provider registry for this kind.
    ApprovedProvider,
}

/// An attestation that passed verification, with the audit trail of who
/// signed it and why the signature was trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedEvidence {
    /// The verified attestation.
    pub attestation: EvidenceAttestation,
    /// Account derived from the signing key.
    pub signer: AccountId,
    /// Trust path that admitted the signer.
    pub trust: SignerTrust,
    /// When verification happened.
    pub verified_at: Timestamp,
}

/// Authenticity metadata the uploader tooling extracts from an evidence blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityReport {
    /// Whether C2PA provenance validated.
    pub c2pa_valid: bool,
    /// Whether EXIF metadata looked tampered.
    pub exif_suspicious: bool,
    /// Heuristic risk score, 0 (clean) to 100.
    pub risk_score: u8,
}

/// The off-chain evidence document an attestation's content hash commits to.
///
/// The engine treats the envelope as opaque beyond hashing; the fields exist
/// so uploader tooling and jurors agree on one canonical layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEnvelope {
    /// Location of the raw blob.
    pub uri: String,
    /// SHA-256 of the raw blob bytes.
    pub blob_sha256: ContentDigest,
    /// SHA-256 of the OCR-extracted text, or the zero digest when absent.
    pub ocr_text_hash: ContentDigest,
    /// Structured fields extracted from the document.
    pub extracted_fields: BTreeMap<String, String>,
    /// Authenticity assessment of the blob.
    pub authenticity: AuthenticityReport,
    /// The verdict the evidence supports.
    pub verdict: bool,
    /// The round the envelope was prepared for.
    pub round_index: RoundIndex,
    /// Expiry mirrored into the attestation.
    pub expires_at: Timestamp,
}

impl EvidenceEnvelope {
    /// Build an envelope around a raw evidence blob.
    pub fn for_blob(
        uri: impl Into<String>,
        blob: &[u8],
        verdict: bool,
        round_index: RoundIndex,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            uri: uri.into(),
            blob_sha256: sha256_blob(blob),
            ocr_text_hash: ContentDigest::from_bytes([0u8; 32]),
            extracted_fields: BTreeMap::new(),
            authenticity: AuthenticityReport::default(),
            verdict,
            round_index,
            expires_at,
        }
    }

    /// The content hash an attestation over this envelope must carry.
    pub fn content_hash(&self) -> Result<ContentDigest, EngineError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(sha256_digest(&canonical))
    }
}

// ---------------------------------------------------------------------------
// Message encodings
// ---------------------------------------------------------------------------

/// Compute the legacy flat message digest for an attestation.
///
/// Fixed field order: claim id (u64 BE), round index (u32 BE), kind string,
/// content hash, verdict byte, uri, expiry (i64 BE). The signature is over
/// this digest directly.
pub fn legacy_message_digest(
    claim_id: ClaimId,
    round_index: RoundIndex,
    kind: &EvidenceKind,
    content_hash: &ContentDigest,
    verdict: bool,
    uri: &str,
    expires_at: Timestamp,
) -> ContentDigest {
    let mut buf = Vec::with_capacity(64 + kind.as_str().len() + uri.len());
    buf.extend_from_slice(&claim_id.0.to_be_bytes());
    buf.extend_from_slice(&round_index.0.to_be_bytes());
    buf.extend_from_slice(kind.as_str().as_bytes());
    buf.extend_from_slice(content_hash.as_bytes());
    buf.push(verdict as u8);
    buf.extend_from_slice(uri.as_bytes());
    buf.extend_from_slice(&expires_at.epoch_secs().to_be_bytes());
    sha256_blob(&buf)
}

/// Typed attestation message, bound to the engine domain.
#[derive(Serialize)]
struct TypedMessage<'a> {
    domain: &'a EngineDomain,
    claim_id: u64,
    round_index: u32,
    kind: &'a str,
    content_hash: String,
    verdict: bool,
    uri: &'a str,
    expires_at: i64,
}

/// Produce the canonical bytes a typed attestation signs.
pub fn typed_message_bytes(
    domain: &EngineDomain,
    attestation: &EvidenceAttestation,
) -> Result<CanonicalBytes, EngineError> {
    let message = TypedMessage {
        domain,
        claim_id: attestation.claim_id.0,
        round_index: attestation.round_index.0,
        kind: attestation.kind.as_str(),
        content_hash: attestation.content_hash.to_hex(),
        verdict: attestation.verdict,
        uri: &attestation.uri,
        expires_at: attestation.expires_at.epoch_secs(),
    };
    Ok(CanonicalBytes::new(&message)?)
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Which message encoding the attestation was signed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceEncoding {
    /// Flat digest of concatenated fields, signed directly.
    LegacyFlat,
    /// Domain-separated canonical message.
    TypedDomain,
}

/// Verify an attestation under the given encoding.
///
/// Checks, in order: signature over the reconstructed message; signer trust
/// (oracle key or registry approval for the kind); expiry against `now`.
///
/// # Errors
///
/// [`EngineError::SignatureInvalid`], [`EngineError::ProviderNotApproved`],
/// or [`EngineError::ExpiredEvidence`].
pub fn verify_attestation(
    attestation: &EvidenceAttestation,
    encoding: EvidenceEncoding,
    domain: &EngineDomain,
    oracle_signer: &AccountId,
    registry: &ProviderRegistry,
    now: Timestamp,
) -> Result<VerifiedEvidence, EngineError> {
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
            verify_digest(&digest, &attestation.signature, &attestation.public_key)
        }
        EvidenceEncoding::TypedDomain => {
            let bytes = typed_message_bytes(domain, attestation)?;
            verify(&bytes, &attestation.signature, &attestation.public_key)
        }
    }
    .map_err(|e| EngineError::SignatureInvalid {
        reason: e.to_string(),
    })?;

    let signer = attestation.public_key.account_id();
    let trust = if &signer == oracle_signer {
        SignerTrust::OracleSigner
    } else if registry.is_approved(&signer, &attestation.kind) {
        SignerTrust::ApprovedProvider
    } else {
        return Err(EngineError::ProviderNotApproved {
            provider: signer,
            kind: attestation.kind.as_str().to_string(),
        });
    };

    if attestation.expires_at < now {
        return Err(EngineError::ExpiredEvidence {
            expires_at: attestation.expires_at,
            now,
        });
    }

    Ok(VerifiedEvidence {
        attestation: attestation.clone(),
        signer,
        trust,
        verified_at: now,
    })
}
