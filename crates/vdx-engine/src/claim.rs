//! # Claim and Round State
//!
//! A claim is adjudicated over one or more rounds. Each round runs the
//! commit-reveal cycle: `Open → CommitPhase → RevealPhase → Resolved`,
//! with `VoidedNoQuorum` as the alternative ending when too few votes are
//! revealed, and `Appealed` marking a resolved round that was superseded by
//! a successor on the same claim.
//!
//! ## Transition Graph
//!
//! ```text
//! Open ──dispute bond──▶ CommitPhase ──commit deadline──▶ RevealPhase
//!                                                             │
//!                                    ┌────────────────────────┤
//!                                    │                        │
//!                          quorum missed                 quorum met
//!                                    │                        │
//!                                    ▼                        ▼
//!                             VoidedNoQuorum               Resolved
//!                                                             │
//!                                                         appeal()
//!                                                             │
//!                                                             ▼
//!                                                          Appealed
//! ```
//!
//! Appeal rounds skip `Open` — the appellant's fresh bond opens them
//! directly in `CommitPhase`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use vdx_core::{AccountId, ClaimId, RoundIndex, Timestamp};

use crate::amount::Amount;
use crate::evidence::VerifiedEvidence;
use crate::settlement::SettlementSheet;
use crate::vote::VoteRecord;

// ── Verdict ────────────────────────────────────────────────────────────

/// The adjudicated truth value of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// No binding tally has been produced yet.
    Undetermined,
    /// The claim was upheld.
    True,
    /// The claim was rejected. Also the tie-break outcome.
    False,
}

impl Verdict {
    /// The canonical string name of this verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undetermined => "UNDETERMINED",
            Self::True => "TRUE",
            Self::False => "FALSE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Round State ────────────────────────────────────────────────────────

/// The lifecycle state of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// Bonded by the claimant, waiting for a dispute bond.
    Open,
    /// Jurors may commit votes until the commit deadline.
    CommitPhase,
    /// Jurors may reveal until the reveal deadline.
    RevealPhase,
    /// Tally produced with quorum; settleable and appealable.
    Resolved,
    /// Reveal window closed under quorum; all contributions refundable.
    /// Terminal state.
    VoidedNoQuorum,
    /// Superseded by an appeal round on the same claim; still settleable
    /// under its own verdict. Terminal state.
    Appealed,
}

impl RoundState {
    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::CommitPhase => "COMMIT_PHASE",
            Self::RevealPhase => "REVEAL_PHASE",
            Self::Resolved => "RESOLVED",
            Self::VoidedNoQuorum => "VOIDED_NO_QUORUM",
            Self::Appealed => "APPEALED",
        }
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::VoidedNoQuorum | Self::Appealed)
    }

    /// Whether settlement may read this round.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Resolved | Self::VoidedNoQuorum | Self::Appealed)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [RoundState] {
        match self {
            Self::Open => &[Self::CommitPhase],
            Self::CommitPhase => &[Self::RevealPhase],
            Self::RevealPhase => &[Self::Resolved, Self::VoidedNoQuorum],
            Self::Resolved => &[Self::Appealed],
            Self::VoidedNoQuorum | Self::Appealed => &[],
        }
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Round ──────────────────────────────────────────────────────────────

/// One adjudication round of a claim.
///
/// Owned exclusively by its parent [`Claim`]. Immutable once final except
/// for settlement bookkeeping (the payout-claimed set and per-vote claimed
/// flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// The parent claim.
    pub claim_id: ClaimId,
    /// Zero-based index within the claim.
    pub index: RoundIndex,
    /// Current lifecycle state.
    pub state: RoundState,
    /// When the round was opened.
    pub opened_at: Timestamp,
    /// The claimant-side account (the claim's claimant).
    pub claimant: AccountId,
    /// Claimant-side bond. Zero in appeal rounds opened by a disputer.
    pub claimant_bond: Amount,
    /// Disputer-side bonds by contributor.
    pub disputer_bonds: BTreeMap<AccountId, Amount>,
    /// Who opened this round as an appeal, if anyone.
    pub appellant: Option<AccountId>,
    /// Appeal fee accumulated on this round.
    pub appeal_fee: Amount,
    /// Quorum requirement snapshot taken at round creation.
    pub min_quorum: u32,
    /// End of the commit window; set when the round enters `CommitPhase`.
    pub commit_deadline: Option<Timestamp>,
    /// End of the reveal window; set when the round enters `CommitPhase`.
    pub reveal_deadline: Option<Timestamp>,
    /// Verdict produced at resolution.
    pub verdict: Verdict,
    /// Whether the revealed-vote count reached the quorum snapshot.
    pub quorum_met: bool,
    /// When the round reached a final state.
    pub closed_at: Option<Timestamp>,
    /// Vote records by voter.
    pub votes: BTreeMap<AccountId, VoteRecord>,
    /// Accepted evidence attestations.
    pub evidence: Vec<VerifiedEvidence>,
    /// Settlement figures computed at finalization.
    pub settlement: Option<SettlementSheet>,
    /// Participants who have claimed their payout.
    pub payouts_claimed: BTreeSet<AccountId>,
}

impl Round {
    /// Create a round in `Open` with the claimant's bond.
    pub fn open(
        claim_id: ClaimId,
        index: RoundIndex,
        claimant: AccountId,
        claimant_bond: Amount,
        min_quorum: u32,
        opened_at: Timestamp,
    ) -> Self {
        Self {
            claim_id,
            index,
            state: RoundState::Open,
            opened_at,
            claimant,
            claimant_bond,
            disputer_bonds: BTreeMap::new(),
            appellant: None,
            appeal_fee: Amount::ZERO,
            min_quorum,
            commit_deadline: None,
            reveal_deadline: None,
            verdict: Verdict::Undetermined,
            quorum_met: false,
            closed_at: None,
            votes: BTreeMap::new(),
            evidence: Vec::new(),
            settlement: None,
            payouts_claimed: BTreeSet::new(),
        }
    }

    /// Total of all disputer-side bonds.
    pub fn disputer_bond_total(&self) -> Amount {
        self.disputer_bonds
            .values()
            .fold(Amount::ZERO, |acc, b| acc.saturating_add(*b))
    }

    /// Total stake committed by all voters.
    pub fn total_stake(&self) -> Amount {
        self.votes
            .values()
            .fold(Amount::ZERO, |acc, v| acc.saturating_add(v.stake))
    }

    /// Everything an account paid into this round (stake, bonds, fee).
    pub fn contribution_of(&self, account: &AccountId) -> Amount {
        let mut total = Amount::ZERO;
        if let Some(record) = self.votes.get(account) {
            total = total.saturating_add(record.stake);
        }
        if account == &self.claimant {
            total = total.saturating_add(self.claimant_bond);
        }
        if let Some(bond) = self.disputer_bonds.get(account) {
            total = total.saturating_add(*bond);
        }
        if self.appellant.as_ref() == Some(account) {
            total = total.saturating_add(self.appeal_fee);
        }
        total
    }

    /// Whether the account contributed anything to this round.
    pub fn is_participant(&self, account: &AccountId) -> bool {
        self.votes.contains_key(account)
            || (account == &self.claimant && !self.claimant_bond.is_zero())
            || self.disputer_bonds.contains_key(account)
            || (self.appellant.as_ref() == Some(account) && !self.appeal_fee.is_zero())
    }

    /// All accounts that contributed to this round.
    pub fn participants(&self) -> BTreeSet<AccountId> {
        let mut set: BTreeSet<AccountId> = self.votes.keys().copied().collect();
        if !self.claimant_bond.is_zero() {
            set.insert(self.claimant);
        }
        set.extend(self.disputer_bonds.keys().copied());
        if let Some(appellant) = self.appellant {
            if !self.appeal_fee.is_zero() {
                set.insert(appellant);
            }
        }
        set
    }
}

// ── Claim ──────────────────────────────────────────────────────────────

/// A disputed claim and its adjudication history.
///
/// Created on submission, mutated only by round-lifecycle transitions,
/// never deleted. At most one round is active at any time: the last element
/// of `rounds`, when it is non-final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Monotonically assigned identifier.
    pub id: ClaimId,
    /// The submitting account.
    pub claimant: AccountId,
    /// Free-text description of the claimed event.
    pub description: String,
    /// When the claim was submitted.
    pub created_at: Timestamp,
    /// Whether the latest round resolved with quorum and no pending appeal.
    pub resolved: bool,
    /// The claim-level verdict; `Undetermined` until resolution and while
    /// an appeal round is in flight.
    pub final_verdict: Verdict,
    /// Number of appeals taken so far.
    pub appeal_count: u32,
    /// Adjudication rounds, oldest first.
    pub rounds: Vec<Round>,
}

impl Claim {
    /// Create a freshly submitted, undisputed claim.
    pub fn submit(
        id: ClaimId,
        claimant: AccountId,
        description: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            claimant,
            description,
            created_at,
            resolved: false,
            final_verdict: Verdict::Undetermined,
            appeal_count: 0,
            rounds: Vec::new(),
        }
    }

    /// The most recent round, if any round was ever opened.
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Mutable access to the most recent round.
    pub fn current_round_mut(&mut self) -> Option<&mut Round> {
        self.rounds.last_mut()
    }

    /// A round by index.
    pub fn round(&self, index: RoundIndex) -> Option<&Round> {
        self.rounds.get(index.0 as usize)
    }

    /// Mutable access to a round by index.
    pub fn round_mut(&mut self, index: RoundIndex) -> Option<&mut Round> {
        self.rounds.get_mut(index.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(tag: u8) -> AccountId {
        AccountId::from_key_bytes(&[tag; 32])
    }

    fn ts() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn open_round() -> Round {
        Round::open(ClaimId(0), RoundIndex(0), account(1), Amount::new(100), 2, ts())
    }

    #[test]
    fn round_state_terminality() {
        assert!(!RoundState::Open.is_terminal());
        assert!(!RoundState::CommitPhase.is_terminal());
        assert!(!RoundState::RevealPhase.is_terminal());
        assert!(!RoundState::Resolved.is_terminal());
        assert!(RoundState::VoidedNoQuorum.is_terminal());
        assert!(RoundState::Appealed.is_terminal());
    }

    #[test]
    fn final_states_are_settleable() {
        assert!(RoundState::Resolved.is_final());
        assert!(RoundState::VoidedNoQuorum.is_final());
        assert!(RoundState::Appealed.is_final());
        assert!(!RoundState::RevealPhase.is_final());
    }

    #[test]
    fn transition_graph() {
        assert_eq!(RoundState::Open.valid_transitions(), &[RoundState::CommitPhase]);
        assert_eq!(
            RoundState::RevealPhase.valid_transitions(),
            &[RoundState::Resolved, RoundState::VoidedNoQuorum]
        );
        assert_eq!(RoundState::Resolved.valid_transitions(), &[RoundState::Appealed]);
        assert!(RoundState::Appealed.valid_transitions().is_empty());
    }

    #[test]
    fn open_round_shape() {
        let round = open_round();
        assert_eq!(round.state, RoundState::Open);
        assert_eq!(round.claimant_bond, Amount::new(100));
        assert_eq!(round.verdict, Verdict::Undetermined);
        assert!(round.commit_deadline.is_none());
        assert!(round.votes.is_empty());
    }

    #[test]
    fn disputer_bond_total_sums() {
        let mut round = open_round();
        round.disputer_bonds.insert(account(2), Amount::new(40));
        round.disputer_bonds.insert(account(3), Amount::new(60));
        assert_eq!(round.disputer_bond_total(), Amount::new(100));
    }

    #[test]
    fn contribution_covers_all_roles() {
        let mut round = open_round();
        round.disputer_bonds.insert(account(2), Amount::new(40));
        round.appellant = Some(account(2));
        round.appeal_fee = Amount::new(5);

        assert_eq!(round.contribution_of(&account(1)), Amount::new(100));
        assert_eq!(round.contribution_of(&account(2)), Amount::new(45));
        assert_eq!(round.contribution_of(&account(9)), Amount::ZERO);
        assert!(round.is_participant(&account(2)));
        assert!(!round.is_participant(&account(9)));
    }

    #[test]
    fn participants_deduplicate_roles() {
        let mut round = open_round();
        round.disputer_bonds.insert(account(2), Amount::new(40));
        round.appellant = Some(account(2));
        round.appeal_fee = Amount::new(5);
        let participants = round.participants();
        assert_eq!(participants.len(), 2);
        assert!(participants.contains(&account(1)));
        assert!(participants.contains(&account(2)));
    }

    #[test]
    fn submitted_claim_has_no_rounds() {
        let claim = Claim::submit(ClaimId(0), account(1), "storm damage".to_string(), ts());
        assert!(claim.current_round().is_none());
        assert_eq!(claim.final_verdict, Verdict::Undetermined);
        assert!(!claim.resolved);
        assert_eq!(claim.appeal_count, 0);
    }

    #[test]
    fn round_lookup_by_index() {
        let mut claim = Claim::submit(ClaimId(0), account(1), "x".to_string(), ts());
        claim.rounds.push(open_round());
        assert!(claim.round(RoundIndex(0)).is_some());
        assert!(claim.round(RoundIndex(1)).is_none());
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Undetermined.as_str(), "UNDETERMINED");
        assert_eq!(format!("{}", Verdict::True), "TRUE");
        assert_eq!(format!("{}", Verdict::False), "FALSE");
    }

    #[test]
    fn claim_serde_roundtrip() {
        let mut claim = Claim::submit(ClaimId(3), account(1), "lost cargo".to_string(), ts());
        claim.rounds.push(open_round());
        let json = serde_json::to_string(&claim).unwrap();
        let parsed: Claim = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, claim.id);
        assert_eq!(parsed.rounds.len(), 1);
        assert_eq!(parsed.rounds[0].state, RoundState::Open);
    }
}
