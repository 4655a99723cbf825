//! # Provider Registry
//!
//! A capability map from `(provider account, evidence kind)` to an approval
//! flag. The evidence verifier consults it when the attestation signer is
//! not the oracle. Approval is a flat flag — revocation sets it false, and
//! no history is retained.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use vdx_core::AccountId;

/// Category of third-party evidence, keyed by string.
///
/// The well-known kinds get dedicated variants; anything else rides in
/// `Other` so new provider categories need no engine change. Parsing is the
/// canonical constructor — `parse("police")` yields [`Police`], never
/// `Other("police")`.
///
/// [`Police`]: EvidenceKind::Police
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvidenceKind {
    /// Police or incident reports.
    Police,
    /// Automated oracle feeds.
    Oracle,
    /// Domain expert assessments.
    Expert,
    /// Community-sourced attestations.
    Community,
    /// Any other provider category.
    Other(String),
}

impl EvidenceKind {
    /// The canonical string identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Police => "police",
            Self::Oracle => "oracle",
            Self::Expert => "expert",
            Self::Community => "community",
            Self::Other(s) => s,
        }
    }

    /// Parse a kind from its string identifier.
    pub fn parse(s: &str) -> Self {
        match s {
            "police" => Self::Police,
            "oracle" => Self::Oracle,
            "expert" => Self::Expert,
            "community" => Self::Community,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EvidenceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EvidenceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Approval map consulted by the evidence verifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderRegistry {
    approvals: BTreeMap<AccountId, BTreeMap<EvidenceKind, bool>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the approval flag for a provider and evidence kind.
    pub fn set_approval(&mut self, provider: AccountId, kind: EvidenceKind, approved: bool) {
        self.approvals
            .entry(provider)
            .or_default()
            .insert(kind, approved);
    }

    /// Whether a provider is approved for an evidence kind.
    pub fn is_approved(&self, provider: &AccountId, kind: &EvidenceKind) -> bool {
        self.approvals
            .get(provider)
            .and_then(|kinds| kinds.get(kind))
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(tag: u8) -> AccountId {
        AccountId::from_key_bytes(&[tag; 32])
    }

    #[test]
    fn unknown_provider_not_approved() {
        let registry = ProviderRegistry::new();
        assert!(!registry.is_approved(&account(1), &EvidenceKind::Police));
    }

    #[test]
    fn approval_is_per_kind() {
        let mut registry = ProviderRegistry::new();
        registry.set_approval(account(1), EvidenceKind::Police, true);
        assert!(registry.is_approved(&account(1), &EvidenceKind::Police));
        assert!(!registry.is_approved(&account(1), &EvidenceKind::Expert));
        assert!(!registry.is_approved(&account(2), &EvidenceKind::Police));
    }

    #[test]
    fn approval_can_be_revoked() {
        let mut registry = ProviderRegistry::new();
        registry.set_approval(account(1), EvidenceKind::Oracle, true);
        registry.set_approval(account(1), EvidenceKind::Oracle, false);
        assert!(!registry.is_approved(&account(1), &EvidenceKind::Oracle));
    }

    #[test]
    fn kind_parse_known_and_other() {
        assert_eq!(EvidenceKind::parse("police"), EvidenceKind::Police);
        assert_eq!(EvidenceKind::parse("community"), EvidenceKind::Community);
        assert_eq!(
            EvidenceKind::parse("satellite"),
            EvidenceKind::Other("satellite".to_string())
        );
    }

    #[test]
    fn kind_display_matches_as_str() {
        for kind in [
            EvidenceKind::Police,
            EvidenceKind::Oracle,
            EvidenceKind::Expert,
            EvidenceKind::Community,
            EvidenceKind::Other("drone".to_string()),
        ] {
            assert_eq!(format!("{kind}"), kind.as_str());
        }
    }

    #[test]
    fn kind_serde_roundtrip_canonicalizes() {
        let json = serde_json::to_string(&EvidenceKind::Police).unwrap();
        assert_eq!(json, "\"police\"");
        let parsed: EvidenceKind = serde_json::from_str("\"police\"").unwrap();
        assert_eq!(parsed, EvidenceKind::Police);
        let other: EvidenceKind = serde_json::from_str("\"satellite\"").unwrap();
        assert_eq!(other, EvidenceKind::Other("satellite".to_string()));
    }

    #[test]
    fn registry_serde_roundtrip() {
        let mut registry = ProviderRegistry::new();
        registry.set_approval(account(3), EvidenceKind::Expert, true);
        let json = serde_json::to_string(&registry).unwrap();
        let parsed: ProviderRegistry = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_approved(&account(3), &EvidenceKind::Expert));
    }
}
