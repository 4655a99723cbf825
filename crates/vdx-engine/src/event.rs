//! # Engine Events
//!
//! Every successful command appends a structured record to the engine's
//! event log carrying the affected identifiers and resulting state. The log
//! is append-only and queryable; it is the machine-readable counterpart of
//! the `tracing` output.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vdx_core::{AccountId, ClaimId, RoundIndex, Timestamp};

use crate::amount::Amount;
use crate::claim::Verdict;
use crate::evidence::SignerTrust;

/// A single entry in the engine's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// When the event was recorded (engine clock).
    pub at: Timestamp,
    /// What happened.
    pub kind: EventKind,
}

impl EngineEvent {
    /// Create an event stamped at the given instant.
    pub fn new(at: Timestamp, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            at,
            kind,
        }
    }
}

/// The payload of an engine event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A claim was submitted.
    ClaimSubmitted {
        /// The new claim.
        claim_id: ClaimId,
        /// The submitting account.
        claimant: AccountId,
    },
    /// A round was opened with the claimant's bond.
    RoundOpened {
        /// The bonded claim.
        claim_id: ClaimId,
        /// The new round.
        round_index: RoundIndex,
        /// The claimant's bond.
        bond: Amount,
    },
    /// A dispute bond arrived and the commit window opened.
    RoundDisputed {
        /// The disputed claim.
        claim_id: ClaimId,
        /// The disputed round.
        round_index: RoundIndex,
        /// The disputing account.
        disputer: AccountId,
        /// The disputer's bond.
        bond: Amount,
        /// End of the commit window.
        commit_deadline: Timestamp,
        /// End of the reveal window.
        reveal_deadline: Timestamp,
    },
    /// A juror committed a hidden vote.
    VoteCommitted {
        /// The claim voted on.
        claim_id: ClaimId,
        /// The round voted on.
        round_index: RoundIndex,
        /// The committing juror.
        voter: AccountId,
        /// Stake backing the vote.
        stake: Amount,
    },
    /// A juror revealed their vote.
    VoteRevealed {
        /// The claim voted on.
        claim_id: ClaimId,
        /// The round voted on.
        round_index: RoundIndex,
        /// The revealing juror.
        voter: AccountId,
        /// The revealed vote.
        vote: bool,
    },
    /// A signed attestation passed verification and was recorded.
    EvidenceAccepted {
        /// The claim the evidence concerns.
        claim_id: ClaimId,
        /// The round the evidence concerns.
        round_index: RoundIndex,
        /// The attesting account.
        signer: AccountId,
        /// How the signer was trusted.
        trust: SignerTrust,
        /// The verdict the evidence supports.
        verdict: bool,
    },
    /// A round resolved with quorum.
    RoundResolved {
        /// The resolved claim.
        claim_id: ClaimId,
        /// The resolved round.
        round_index: RoundIndex,
        /// The binding verdict.
        verdict: Verdict,
        /// Value routed to the treasury.
        treasury_transfer: Amount,
    },
    /// A round closed without reaching quorum.
    RoundVoided {
        /// The voided claim.
        claim_id: ClaimId,
        /// The voided round.
        round_index: RoundIndex,
        /// Revealed votes at close.
        revealed_count: u32,
        /// The quorum the round needed.
        min_quorum: u32,
    },
    /// A resolved round was appealed and a successor opened.
    RoundAppealed {
        /// The appealed claim.
        claim_id: ClaimId,
        /// The superseded round.
        round_index: RoundIndex,
        /// The newly opened round.
        new_round_index: RoundIndex,
        /// The appealing account.
        appellant: AccountId,
        /// The appeal fee paid.
        fee: Amount,
    },
    /// A participant claimed their settlement payout.
    RewardClaimed {
        /// The settled claim.
        claim_id: ClaimId,
        /// The settled round.
        round_index: RoundIndex,
        /// The paid participant.
        account: AccountId,
        /// The payout amount.
        amount: Amount,
    },
    /// A provider approval flag changed.
    ProviderApproved {
        /// The provider account.
        provider: AccountId,
        /// The evidence kind.
        kind: String,
        /// The new flag value.
        approved: bool,
    },
    /// The parameter set was replaced.
    ParametersUpdated,
    /// The oracle signer changed.
    OracleSignerUpdated {
        /// The new oracle signer.
        oracle_signer: AccountId,
    },
    /// The treasury account changed.
    TreasuryUpdated {
        /// The new treasury account.
        treasury: AccountId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_get_unique_ids() {
        let at = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let a = EngineEvent::new(at, EventKind::ParametersUpdated);
        let b = EngineEvent::new(at, EventKind::ParametersUpdated);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn event_serde_roundtrip() {
        let at = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let event = EngineEvent::new(
            at,
            EventKind::VoteCommitted {
                claim_id: ClaimId(1),
                round_index: RoundIndex(0),
                voter: AccountId::from_key_bytes(&[1; 32]),
                stake: Amount::new(500),
            },
        );
        let json = serde_json::to_string(&event).unwrap();
        let parsed: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
