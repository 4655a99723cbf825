//! # Vote Commitments — Hiding Digests for Commit-Reveal Voting
//!
//! A juror commits to a vote by publishing a digest that binds the vote to
//! the juror, the claim, the round, and a one-time nonce. The digest hides
//! the vote until the reveal phase, when the juror discloses (vote, nonce)
//! and the engine recomputes the digest to check the binding.
//!
//! ## Security Invariant
//!
//! The preimage layout is fixed-width and domain-separated:
//!
//! ```text
//! "veridex/vote-commitment/v1" || claim_id (u64 BE) || round_index (u32 BE)
//!     || voter (32 bytes) || vote (1 byte) || nonce (32 bytes)
//! ```
//!
//! Every field has a fixed size and position, so no two distinct tuples
//! share a preimage, and the domain tag prevents a commitment from being
//! replayed as any other kind of signed or hashed message in the stack.

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use vdx_core::error::CryptoError;
use vdx_core::{AccountId, ClaimId, ContentDigest, RoundIndex};

/// Domain tag for vote commitment digests.
const COMMITMENT_DOMAIN: &[u8] = b"veridex/vote-commitment/v1";

/// A 32-byte one-time nonce blinding a vote commitment.
///
/// Jurors must use a fresh random nonce per commitment; reusing a nonce
/// across rounds lets an observer test candidate votes offline.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoteNonce(pub [u8; 32]);

impl VoteNonce {
    /// Generate a fresh random nonce.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a nonce from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw nonce bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the nonce as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a nonce from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.trim().to_lowercase();
        if hex.len() != 64 {
            return Err(CryptoError::KeyError(format!(
                "nonce hex must be 64 chars, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pos = i * 2;
            *byte = u8::from_str_radix(&hex[pos..pos + 2], 16)
                .map_err(|e| CryptoError::KeyError(format!("invalid hex at position {pos}: {e}")))?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for VoteNonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for VoteNonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for VoteNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Nonces are secret until reveal; show only a prefix.
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "VoteNonce({prefix}...)")
    }
}

/// Compute the commitment digest for a vote tuple.
///
/// Deterministic over the full tuple: altering any field yields a different
/// digest. Both the committing juror and the engine's reveal check call this
/// same function.
pub fn vote_commitment(
    claim_id: ClaimId,
    round_index: RoundIndex,
    voter: &AccountId,
    vote: bool,
    nonce: &VoteNonce,
) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update(claim_id.0.to_be_bytes());
    hasher.update(round_index.0.to_be_bytes());
    hasher.update(voter.as_bytes());
    hasher.update([vote as u8]);
    hasher.update(nonce.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    ContentDigest::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(tag: u8) -> AccountId {
        AccountId::from_key_bytes(&[tag; 32])
    }

    #[test]
    fn commitment_is_deterministic() {
        let nonce = VoteNonce::from_bytes([5u8; 32]);
        let a = vote_commitment(ClaimId(0), RoundIndex(0), &voter(1), true, &nonce);
        let b = vote_commitment(ClaimId(0), RoundIndex(0), &voter(1), true, &nonce);
        assert_eq!(a, b);
    }

    #[test]
    fn any_altered_field_changes_digest() {
        let nonce = VoteNonce::from_bytes([5u8; 32]);
        let base = vote_commitment(ClaimId(0), RoundIndex(0), &voter(1), true, &nonce);

        assert_ne!(
            base,
            vote_commitment(ClaimId(1), RoundIndex(0), &voter(1), true, &nonce)
        );
        assert_ne!(
            base,
            vote_commitment(ClaimId(0), RoundIndex(1), &voter(1), true, &nonce)
        );
        assert_ne!(
            base,
            vote_commitment(ClaimId(0), RoundIndex(0), &voter(2), true, &nonce)
        );
        assert_ne!(
            base,
            vote_commitment(ClaimId(0), RoundIndex(0), &voter(1), false, &nonce)
        );
        assert_ne!(
            base,
            vote_commitment(
                ClaimId(0),
                RoundIndex(0),
                &voter(1),
                true,
                &VoteNonce::from_bytes([6u8; 32])
            )
        );
    }

    #[test]
    fn random_nonces_are_distinct() {
        assert_ne!(VoteNonce::random().as_bytes(), VoteNonce::random().as_bytes());
    }

    #[test]
    fn nonce_hex_roundtrip() {
        let nonce = VoteNonce::random();
        assert_eq!(VoteNonce::from_hex(&nonce.to_hex()).unwrap(), nonce);
    }

    #[test]
    fn nonce_invalid_hex_rejected() {
        assert!(VoteNonce::from_hex("abc").is_err());
        assert!(VoteNonce::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn nonce_debug_shows_prefix_only() {
        let nonce = VoteNonce::from_bytes([0xabu8; 32]);
        let debug = format!("{nonce:?}");
        assert!(debug.starts_with("VoteNonce(abababab"));
        assert!(debug.ends_with("...)"));
        assert!(!debug.contains(&nonce.to_hex()));
    }

    #[test]
    fn nonce_serde_roundtrip() {
        let nonce = VoteNonce::random();
        let json = serde_json::to_string(&nonce).unwrap();
        let parsed: VoteNonce = serde_json::from_str(&json).unwrap();
        assert_eq!(nonce, parsed);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Two tuples differing in any field never collide.
        #[test]
        fn binding_over_random_tuples(
            claim_a in any::<u64>(), claim_b in any::<u64>(),
            round_a in any::<u32>(), round_b in any::<u32>(),
            vote_a in any::<bool>(), vote_b in any::<bool>(),
            voter_seed_a in any::<u8>(), voter_seed_b in any::<u8>(),
            nonce_a in any::<[u8; 32]>(), nonce_b in any::<[u8; 32]>(),
        ) {
            let tuple_a = (claim_a, round_a, voter_seed_a, vote_a, nonce_a);
            let tuple_b = (claim_b, round_b, voter_seed_b, vote_b, nonce_b);
            let digest_a = vote_commitment(
                ClaimId(claim_a),
                RoundIndex(round_a),
                &AccountId::from_key_bytes(&[voter_seed_a; 32]),
                vote_a,
                &VoteNonce::from_bytes(nonce_a),
            );
            let digest_b = vote_commitment(
                ClaimId(claim_b),
                RoundIndex(round_b),
                &AccountId::from_key_bytes(&[voter_seed_b; 32]),
                vote_b,
                &VoteNonce::from_bytes(nonce_b),
            );
            if tuple_a == tuple_b {
                prop_assert_eq!(digest_a, digest_b);
            } else {
                prop_assert_ne!(digest_a, digest_b);
            }
        }
    }
}
