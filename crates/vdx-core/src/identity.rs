//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the dispute engine. Type-level
//! distinction between identifier namespaces prevents cross-namespace
//! confusion — you cannot pass a `ClaimId` where a `RoundIndex` is expected,
//! and an account is never a bare hex string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// A 32-byte account identity, derived from an Ed25519 public key.
///
/// The derivation is `SHA-256(public key bytes)`, so an account commits to
/// exactly one verification key. Serializes as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Create an account identity from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the account identity for an Ed25519 public key.
    pub fn from_key_bytes(public_key: &[u8; 32]) -> Self {
        let hash = Sha256::digest(public_key);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Return the raw 32-byte account identity.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the account as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse an account from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        let hex = hex.trim().to_lowercase();
        if hex.len() != 64 {
            return Err(CoreError::Validation(format!(
                "account hex must be 64 chars, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in bytes.iter_mut().enumerate() {
            let pos = i * 2;
            *chunk = u8::from_str_radix(&hex[pos..pos + 2], 16).map_err(|e| {
                CoreError::Validation(format!("invalid hex at position {pos}: {e}"))
            })?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "acct:{}", self.to_hex())
    }
}

/// Monotonically assigned claim identifier.
///
/// Claim ids are allocated sequentially by the ledger, never reused, and
/// never derived from user input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClaimId(pub u64);

impl ClaimId {
    /// The identifier following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "claim:{}", self.0)
    }
}

/// Zero-based index of a round within its claim.
///
/// Round 0 is the first disputed round; an undisputed claim has no rounds
/// at all rather than a sentinel index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RoundIndex(pub u32);

impl RoundIndex {
    /// The index following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RoundIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "round:{}", self.0)
    }
}
