//! # Dispute Engine — Single-Writer Ledger
//!
//! `DisputeEngine` owns all claim, round, vote, and registry state behind
//! `&mut self`. Every state-mutating operation validates first and mutates
//! second, so a rejected call leaves no partial state behind and no funds
//! record is created on failure.
//!
//! Timing gates evaluate against the engine's single [`Clock`], clamped to
//! be monotonically non-decreasing across operations — a misbehaving wall
//! clock cannot reopen a closed window.
//!
//! ## Fatal Invariants
//!
//! Structural corruption of the ledger (a claim record filed under the
//! wrong id, a final round without settlement figures) halts processing
//! with a panic rather than returning an error: it indicates a bug in the
//! surrounding storage layer, not a caller mistake.

use std::collections::BTreeMap;
use std::sync::Arc;

use vdx_core::{AccountId, ClaimId, Clock, ContentDigest, RoundIndex, Timestamp};
use vdx_crypto::commitment::{vote_commitment, VoteNonce};

use crate::amount::Amount;
use crate::claim::{Claim, Round, RoundState, Verdict};
use crate::error::EngineError;
use crate::event::{EngineEvent, EventKind};
use crate::evidence::{
    verify_attestation, EngineDomain, EvidenceAttestation, EvidenceEncoding, VerifiedEvidence,
};
use crate::params::Parameters;
use crate::registry::{EvidenceKind, ProviderRegistry};
use crate::settlement::{payout_amount, resolved_sheet, voided_sheet, Payout};
use crate::vote::{RevealStatus, Tally, VoteRecord};

/// The claim dispute resolution engine.
///
/// Holds the full adjudication ledger: claims and their rounds, vote
/// records, verified evidence, the provider registry, parameters, and the
/// append-only event log.
pub struct DisputeEngine {
    admin: AccountId,
    params: Parameters,
    domain: EngineDomain,
    registry: ProviderRegistry,
    claims: BTreeMap<ClaimId, Claim>,
    next_claim_id: ClaimId,
    events: Vec<EngineEvent>,
    clock: Arc<dyn Clock>,
    last_now: Timestamp,
}

impl DisputeEngine {
    /// Create an engine with the given administrator, parameters, domain
    /// identity, and clock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameters`] if the initial parameter
    /// set fails validation.
    pub fn new(
        admin: AccountId,
        params: Parameters,
        domain: EngineDomain,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        let last_now = clock.now();
        Ok(Self {
            admin,
            params,
            domain,
            registry: ProviderRegistry::new(),
            claims: BTreeMap::new(),
            next_claim_id: ClaimId(0),
            events: Vec::new(),
            clock,
            last_now,
        })
    }

    // ── Clock ──────────────────────────────────────────────────────────

    /// Read the clock, clamped to be non-decreasing.
    fn tick(&mut self) -> Timestamp {
        let now = self.clock.now();
        if now > self.last_now {
            self.last_now = now;
        }
        self.last_now
    }

    // ── Internal access with corruption checks ─────────────────────────

    fn claim_ref(&self, claim_id: ClaimId) -> Result<&Claim, EngineError> {
        let claim = self
            .claims
            .get(&claim_id)
            .ok_or(EngineError::UnknownClaim { claim_id })?;
        assert!(
            claim.id == claim_id,
            "ledger corruption: claim record {} filed under id {}",
            claim.id,
            claim_id
        );
        Ok(claim)
    }

    fn claim_mut(&mut self, claim_id: ClaimId) -> Result<&mut Claim, EngineError> {
        let claim = self
            .claims
            .get_mut(&claim_id)
            .ok_or(EngineError::UnknownClaim { claim_id })?;
        assert!(
            claim.id == claim_id,
            "ledger corruption: claim record {} filed under id {}",
            claim.id,
            claim_id
        );
        Ok(claim)
    }

    fn record(&mut self, at: Timestamp, kind: EventKind) {
        tracing::info!(target: "vdx_engine", event = ?kind, "engine event");
        self.events.push(EngineEvent::new(at, kind));
    }

    fn require_admin(&self, caller: AccountId) -> Result<(), EngineError> {
        if caller != self.admin {
            return Err(EngineError::NotAdministrator { caller });
        }
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Look up a claim.
    pub fn claim(&self, claim_id: ClaimId) -> Option<&Claim> {
        self.claims.get(&claim_id)
    }

    /// Look up a round.
    pub fn round(&self, claim_id: ClaimId, round_index: RoundIndex) -> Option<&Round> {
        self.claims
            .get(&claim_id)
            .and_then(|c| c.round(round_index))
    }

    /// Look up a voter's record within a round.
    pub fn vote_status(
        &self,
        claim_id: ClaimId,
        round_index: RoundIndex,
        voter: &AccountId,
    ) -> Option<&VoteRecord> {
        self.round(claim_id, round_index)
            .and_then(|r| r.votes.get(voter))
    }

    /// Accepted evidence for a round.
    pub fn evidence(&self, claim_id: ClaimId, round_index: RoundIndex) -> Option<&[VerifiedEvidence]> {
        self.round(claim_id, round_index)
            .map(|r| r.evidence.as_slice())
    }

    /// The append-only event log.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// The current parameter set.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// The provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The engine's domain identity for typed attestations.
    pub fn domain(&self) -> &EngineDomain {
        &self.domain
    }

    // ── Commands ───────────────────────────────────────────────────────

    /// Submit a new claim. Allocates the next claim id; no round is opened.
    pub fn submit_claim(
        &mut self,
        claimant: AccountId,
        description: String,
    ) -> Result<ClaimId, EngineError> {
        let now = self.tick();
        let claim_id = self.next_claim_id;
        self.next_claim_id = claim_id.next();
        self.claims
            .insert(claim_id, Claim::submit(claim_id, claimant, description, now));
        self.record(now, EventKind::ClaimSubmitted { claim_id, claimant });
        Ok(claim_id)
    }

    /// Open a claim's first round with the claimant's bond, or add a
    /// disputer bond to an open round (which starts the commit window), or
    /// reopen a claim whose last round was voided.
    pub fn open_or_dispute_round(
        &mut self,
        caller: AccountId,
        claim_id: ClaimId,
        bond: Amount,
    ) -> Result<RoundIndex, EngineError> {
        let now = self.tick();
        if bond.is_zero() {
            return Err(EngineError::ZeroBond { claim_id, caller });
        }
        let commit_window = self.params.commit_window_secs;
        let reveal_window = self.params.reveal_window_secs;
        let min_quorum = self.params.min_quorum;
        let cooldown = self.params.cooldown_secs;

        let claimant = self.claim_ref(claim_id)?.claimant;
        let claim = self.claim_mut(claim_id)?;

        // First pass: inspect (and, for bond additions, mutate) the last
        // round. Round creation is deferred so the round borrow has ended
        // before the rounds vector grows.
        let new_index = if claim.rounds.is_empty() {
            if caller != claimant {
                return Err(EngineError::NotClaimant { claim_id, caller });
            }
            RoundIndex(0)
        } else {
            let last = claim.rounds.len() - 1;
            let round = &mut claim.rounds[last];
            round.advance_phase(now);
            match round.state {
                RoundState::Open => {
                    if caller == claimant {
                        return Err(EngineError::InvalidTransition {
                            claim_id,
                            round_index: round.index,
                            state: round.state.as_str().to_string(),
                            operation: "open_or_dispute_round",
                            reason: "claimant side already bonded; waiting for a dispute"
                                .to_string(),
                        });
                    }
                    let entry = round.disputer_bonds.entry(caller).or_insert(Amount::ZERO);
                    *entry = entry.saturating_add(bond);
                    let commit_deadline = now.plus_secs(commit_window);
                    let reveal_deadline = commit_deadline.plus_secs(reveal_window);
                    round.state = RoundState::CommitPhase;
                    round.commit_deadline = Some(commit_deadline);
                    round.reveal_deadline = Some(reveal_deadline);
                    let index = round.index;
                    self.record(now, EventKind::RoundDisputed {
                        claim_id,
                        round_index: index,
                        disputer: caller,
                        bond,
                        commit_deadline,
                        reveal_deadline,
                    });
                    return Ok(index);
                }
                RoundState::CommitPhase => {
                    if caller == claimant {
                        return Err(EngineError::InvalidTransition {
                            claim_id,
                            round_index: round.index,
                            state: round.state.as_str().to_string(),
                            operation: "open_or_dispute_round",
                            reason: "claimant cannot join the disputer side".to_string(),
                        });
                    }
                    let entry = round.disputer_bonds.entry(caller).or_insert(Amount::ZERO);
                    *entry = entry.saturating_add(bond);
                    let commit_deadline = round.commit_deadline.unwrap_or(now);
                    let reveal_deadline = round.reveal_deadline.unwrap_or(now);
                    let index = round.index;
                    self.record(now, EventKind::RoundDisputed {
                        claim_id,
                        round_index: index,
                        disputer: caller,
                        bond,
                        commit_deadline,
                        reveal_deadline,
                    });
                    return Ok(index);
                }
                RoundState::RevealPhase => {
                    return Err(EngineError::InvalidTransition {
                        claim_id,
                        round_index: round.index,
                        state: round.state.as_str().to_string(),
                        operation: "open_or_dispute_round",
                        reason: "voting is in progress".to_string(),
                    });
                }
                RoundState::Resolved => {
                    return Err(EngineError::InvalidTransition {
                        claim_id,
                        round_index: round.index,
                        state: round.state.as_str().to_string(),
                        operation: "open_or_dispute_round",
                        reason: "round resolved; reopen via appeal".to_string(),
                    });
                }
                RoundState::VoidedNoQuorum => {
                    let closed_at = round.closed_at.unwrap_or(round.opened_at);
                    let ready_at = closed_at.plus_secs(cooldown);
                    if now < ready_at {
                        return Err(EngineError::CooldownActive { claim_id, ready_at });
                    }
                    if caller != claimant {
                        return Err(EngineError::NotClaimant { claim_id, caller });
                    }
                    round.index.next()
                }
                RoundState::Appealed => {
                    return Err(EngineError::InvalidTransition {
                        claim_id,
                        round_index: round.index,
                        state: round.state.as_str().to_string(),
                        operation: "open_or_dispute_round",
                        reason: "appeal round already open".to_string(),
                    });
                }
            }
        };

        let fresh = Round::open(claim_id, new_index, claimant, bond, min_quorum, now);
        claim.rounds.push(fresh);
        self.record(now, EventKind::RoundOpened {
            claim_id,
            round_index: new_index,
            bond,
        });
        Ok(new_index)
    }

    /// Record a hidden vote commitment with its stake.
    pub fn commit_vote(
        &mut self,
        voter: AccountId,
        claim_id: ClaimId,
        commitment: ContentDigest,
        stake: Amount,
    ) -> Result<(), EngineError> {
        let now = self.tick();
        let claim = self.claim_mut(claim_id)?;
        let round = claim
            .current_round_mut()
            .ok_or(EngineError::UnknownRound {
                claim_id,
                round_index: RoundIndex(0),
            })?;
        round.advance_phase(now);
        let round_index = round.index;
        if round.state != RoundState::CommitPhase {
            let reason = match round.state {
                RoundState::Open => "round not yet disputed".to_string(),
                RoundState::RevealPhase => "commit window closed".to_string(),
                _ => "round is final".to_string(),
            };
            return Err(EngineError::InvalidTransition {
                claim_id,
                round_index,
                state: round.state.as_str().to_string(),
                operation: "commit_vote",
                reason,
            });
        }
        if stake.is_zero() {
            return Err(EngineError::ZeroStake {
                claim_id,
                round_index,
                voter,
            });
        }
        if round.votes.contains_key(&voter) {
            return Err(EngineError::AlreadyCommitted {
                claim_id,
                round_index,
                voter,
            });
        }
        round
            .votes
            .insert(voter, VoteRecord::new(commitment, stake, now));
        self.record(now, EventKind::VoteCommitted {
            claim_id,
            round_index,
            voter,
            stake,
        });
        Ok(())
    }

    /// Reveal a committed vote by disclosing the (vote, nonce) preimage.
    pub fn reveal_vote(
        &mut self,
        voter: AccountId,
        claim_id: ClaimId,
        vote: bool,
        nonce: VoteNonce,
    ) -> Result<(), EngineError> {
        let now = self.tick();
        let claim = self.claim_mut(claim_id)?;
        let round = claim
            .current_round_mut()
            .ok_or(EngineError::UnknownRound {
                claim_id,
                round_index: RoundIndex(0),
            })?;
        round.advance_phase(now);
        let round_index = round.index;
        if round.state != RoundState::RevealPhase {
            let reason = match round.state {
                RoundState::Open => "round not yet disputed".to_string(),
                RoundState::CommitPhase => "commit window still open".to_string(),
                _ => "round is final".to_string(),
            };
            return Err(EngineError::InvalidTransition {
                claim_id,
                round_index,
                state: round.state.as_str().to_string(),
                operation: "reveal_vote",
                reason,
            });
        }
        if let Some(reveal_deadline) = round.reveal_deadline {
            if now >= reveal_deadline {
                return Err(EngineError::InvalidTransition {
                    claim_id,
                    round_index,
                    state: round.state.as_str().to_string(),
                    operation: "reveal_vote",
                    reason: "reveal window closed".to_string(),
                });
            }
        }
        let record = round
            .votes
            .get_mut(&voter)
            .ok_or(EngineError::NoCommitment {
                claim_id,
                round_index,
                voter,
            })?;
        if record.status != RevealStatus::Unrevealed {
            return Err(EngineError::AlreadyRevealed {
                claim_id,
                round_index,
                voter,
            });
        }
        let expected = vote_commitment(claim_id, round_index, &voter, vote, &nonce);
        if expected != record.commitment {
            return Err(EngineError::CommitmentMismatch {
                claim_id,
                round_index,
                voter,
            });
        }
        record.status = if vote {
            RevealStatus::RevealedTrue
        } else {
            RevealStatus::RevealedFalse
        };
        record.revealed_at = Some(now);
        self.record(now, EventKind::VoteRevealed {
            claim_id,
            round_index,
            voter,
            vote,
        });
        Ok(())
    }

    /// Submit an attestation signed under the legacy flat-hash scheme.
    pub fn submit_evidence_signed(
        &mut self,
        attestation: EvidenceAttestation,
    ) -> Result<(), EngineError> {
        self.submit_evidence(attestation, EvidenceEncoding::LegacyFlat)
    }

    /// Submit an attestation signed under the typed, domain-separated scheme.
    pub fn submit_evidence_typed(
        &mut self,
        attestation: EvidenceAttestation,
    ) -> Result<(), EngineError> {
        self.submit_evidence(attestation, EvidenceEncoding::TypedDomain)
    }

    fn submit_evidence(
        &mut self,
        attestation: EvidenceAttestation,
        encoding: EvidenceEncoding,
    ) -> Result<(), EngineError> {
        let now = self.tick();
        let claim_id = attestation.claim_id;
        let round_index = attestation.round_index;

        {
            let claim = self.claim_ref(claim_id)?;
            let round = claim.round(round_index).ok_or(EngineError::UnknownRound {
                claim_id,
                round_index,
            })?;
            if round.state.is_final() {
                return Err(EngineError::InvalidTransition {
                    claim_id,
                    round_index,
                    state: round.state.as_str().to_string(),
                    operation: "submit_evidence",
                    reason: "round is final".to_string(),
                });
            }
        }

        let verified = verify_attestation(
            &attestation,
            encoding,
            &self.domain,
            &self.params.oracle_signer,
            &self.registry,
            now,
        )?;

        let claim = self.claim_mut(claim_id)?;
        let round = claim
            .round_mut(round_index)
            .ok_or(EngineError::UnknownRound {
                claim_id,
                round_index,
            })?;
        if round
            .evidence
            .iter()
            .any(|e| e.signer == verified.signer && e.attestation.kind == attestation.kind)
        {
            return Err(EngineError::EvidenceAlreadyRecorded {
                claim_id,
                round_index,
                provider: verified.signer,
                kind: attestation.kind.as_str().to_string(),
            });
        }
        let signer = verified.signer;
        let trust = verified.trust;
        let verdict = verified.attestation.verdict;
        round.evidence.push(verified);
        self.record(now, EventKind::EvidenceAccepted {
            claim_id,
            round_index,
            signer,
            trust,
            verdict,
        });
        Ok(())
    }

    /// Resolve the claim's active round once its reveal window has closed.
    ///
    /// Returns the round's final state and verdict. Quorum shortfalls void
    /// the round instead of resolving it.
    pub fn resolve(&mut self, claim_id: ClaimId) -> Result<(RoundState, Verdict), EngineError> {
        let now = self.tick();
        let claim = self.claim_mut(claim_id)?;
        let round = claim
            .current_round_mut()
            .ok_or(EngineError::UnknownRound {
                claim_id,
                round_index: RoundIndex(0),
            })?;
        round.advance_phase(now);
        let round_index = round.index;

        match round.state {
            RoundState::Open | RoundState::CommitPhase => {
                let reason = if round.state == RoundState::Open {
                    "round not yet disputed".to_string()
                } else {
                    "commit window still open".to_string()
                };
                return Err(EngineError::InvalidTransition {
                    claim_id,
                    round_index,
                    state: round.state.as_str().to_string(),
                    operation: "resolve",
                    reason,
                });
            }
            RoundState::RevealPhase => {}
            RoundState::Resolved | RoundState::VoidedNoQuorum | RoundState::Appealed => {
                return Err(EngineError::InvalidTransition {
                    claim_id,
                    round_index,
                    state: round.state.as_str().to_string(),
                    operation: "resolve",
                    reason: "round already final".to_string(),
                });
            }
        }
        if let Some(reveal_deadline) = round.reveal_deadline {
            if now < reveal_deadline {
                return Err(EngineError::InvalidTransition {
                    claim_id,
                    round_index,
                    state: round.state.as_str().to_string(),
                    operation: "resolve",
                    reason: "reveal window still open".to_string(),
                });
            }
        }

        let tally = Tally::from_votes(round.votes.values());
        if tally.revealed_count < round.min_quorum {
            round.state = RoundState::VoidedNoQuorum;
            round.quorum_met = false;
            round.closed_at = Some(now);
            round.settlement = Some(voided_sheet());
            let min_quorum = round.min_quorum;
            let revealed_count = tally.revealed_count;
            self.record(now, EventKind::RoundVoided {
                claim_id,
                round_index,
                revealed_count,
                min_quorum,
            });
            return Ok((RoundState::VoidedNoQuorum, Verdict::Undetermined));
        }

        let verdict = tally.verdict();
        for record in round.votes.values_mut() {
            if record.status == RevealStatus::Unrevealed {
                record.status = RevealStatus::Forfeited;
            }
        }
        round.state = RoundState::Resolved;
        round.verdict = verdict;
        round.quorum_met = true;
        round.closed_at = Some(now);
        let sheet = resolved_sheet(round, verdict);
        round.settlement = Some(sheet);
        claim.resolved = true;
        claim.final_verdict = verdict;
        let treasury_transfer = sheet.treasury_transfer;
        self.record(now, EventKind::RoundResolved {
            claim_id,
            round_index,
            verdict,
            treasury_transfer,
        });
        Ok((RoundState::Resolved, verdict))
    }

    /// Appeal a resolved round, paying the appeal fee and a fresh bond.
    ///
    /// Opens the successor round directly in `CommitPhase` with deadlines
    /// from the current parameters. The prior round stays settleable under
    /// its own verdict but no longer determines claim-level finality.
    pub fn appeal(
        &mut self,
        caller: AccountId,
        claim_id: ClaimId,
        fee: Amount,
        bond: Amount,
    ) -> Result<RoundIndex, EngineError> {
        let now = self.tick();
        let required_fee = self.params.appeal_fee;
        let max_appeals = self.params.max_appeals;
        let commit_window = self.params.commit_window_secs;
        let reveal_window = self.params.reveal_window_secs;
        let min_quorum = self.params.min_quorum;

        let claimant = self.claim_ref(claim_id)?.claimant;
        let claim = self.claim_mut(claim_id)?;
        let (round_index, round_state) = match claim.current_round() {
            Some(round) => (round.index, round.state),
            None => {
                return Err(EngineError::UnknownRound {
                    claim_id,
                    round_index: RoundIndex(0),
                })
            }
        };
        if round_state != RoundState::Resolved {
            return Err(EngineError::InvalidTransition {
                claim_id,
                round_index,
                state: round_state.as_str().to_string(),
                operation: "appeal",
                reason: "only a resolved round can be appealed".to_string(),
            });
        }
        if claim.appeal_count >= max_appeals {
            return Err(EngineError::AppealLimitReached {
                claim_id,
                max_appeals,
            });
        }
        if fee < required_fee {
            return Err(EngineError::InsufficientAppealFee {
                claim_id,
                required: required_fee.to_string(),
                provided: fee.to_string(),
            });
        }
        if bond.is_zero() {
            return Err(EngineError::ZeroBond { claim_id, caller });
        }

        if let Some(round) = claim.current_round_mut() {
            round.state = RoundState::Appealed;
        }
        let new_index = round_index.next();

        let commit_deadline = now.plus_secs(commit_window);
        let reveal_deadline = commit_deadline.plus_secs(reveal_window);
        let mut fresh = Round::open(claim_id, new_index, claimant, Amount::ZERO, min_quorum, now);
        fresh.state = RoundState::CommitPhase;
        fresh.commit_deadline = Some(commit_deadline);
        fresh.reveal_deadline = Some(reveal_deadline);
        fresh.appellant = Some(caller);
        fresh.appeal_fee = fee;
        if caller == claimant {
            fresh.claimant_bond = bond;
        } else {
            fresh.disputer_bonds.insert(caller, bond);
        }

        claim.appeal_count += 1;
        claim.resolved = false;
        claim.final_verdict = Verdict::Undetermined;
        claim.rounds.push(fresh);

        self.record(now, EventKind::RoundAppealed {
            claim_id,
            round_index,
            new_round_index: new_index,
            appellant: caller,
            fee,
        });
        Ok(new_index)
    }

    /// Claim the caller's settlement payout for a final round.
    ///
    /// Pays every role the caller held in the round (voter, bond poster,
    /// appellant) in one shot; callable once per participant.
    pub fn claim_reward(
        &mut self,
        caller: AccountId,
        claim_id: ClaimId,
        round_index: RoundIndex,
    ) -> Result<Payout, EngineError> {
        let now = self.tick();
        let claim = self.claim_mut(claim_id)?;
        let round = claim
            .round_mut(round_index)
            .ok_or(EngineError::UnknownRound {
                claim_id,
                round_index,
            })?;
        if !round.state.is_final() {
            return Err(EngineError::RoundNotFinal {
                claim_id,
                round_index,
                state: round.state.as_str().to_string(),
            });
        }
        if !round.is_participant(&caller) {
            return Err(EngineError::NotAParticipant {
                claim_id,
                round_index,
                account: caller,
            });
        }
        if round.payouts_claimed.contains(&caller) {
            return Err(EngineError::AlreadyClaimed {
                claim_id,
                round_index,
                account: caller,
            });
        }
        let sheet = match round.settlement {
            Some(sheet) => sheet,
            // Settlement figures are written in the same transaction that
            // finalizes a round; their absence is storage-layer corruption.
            None => panic!(
                "ledger corruption: final round {claim_id} {round_index} has no settlement sheet"
            ),
        };
        let amount = payout_amount(round, &sheet, &caller);
        round.payouts_claimed.insert(caller);
        if let Some(record) = round.votes.get_mut(&caller) {
            record.reward_claimed = true;
        }
        self.record(now, EventKind::RewardClaimed {
            claim_id,
            round_index,
            account: caller,
            amount,
        });
        Ok(Payout {
            account: caller,
            claim_id,
            round_index,
            amount,
        })
    }

    // ── Administration ─────────────────────────────────────────────────

    /// Replace the parameter set. Administrator only.
    ///
    /// Open rounds keep the deadlines and quorum snapshots taken at their
    /// creation; the new values apply to rounds opened afterwards.
    pub fn set_parameters(
        &mut self,
        caller: AccountId,
        new: Parameters,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        new.validate()?;
        let now = self.tick();
        self.params = new;
        self.record(now, EventKind::ParametersUpdated);
        Ok(())
    }

    /// Set a provider's approval flag for an evidence kind. Administrator only.
    pub fn approve_provider(
        &mut self,
        caller: AccountId,
        provider: AccountId,
        kind: EvidenceKind,
        approved: bool,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        let now = self.tick();
        self.registry.set_approval(provider, kind.clone(), approved);
        self.record(now, EventKind::ProviderApproved {
            provider,
            kind: kind.as_str().to_string(),
            approved,
        });
        Ok(())
    }

    /// Replace the oracle signer. Administrator only.
    pub fn set_oracle_signer(
        &mut self,
        caller: AccountId,
        oracle_signer: AccountId,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        let now = self.tick();
        self.params.oracle_signer = oracle_signer;
        self.record(now, EventKind::OracleSignerUpdated { oracle_signer });
        Ok(())
    }

    /// Replace the treasury account. Administrator only.
    pub fn set_treasury(
        &mut self,
        caller: AccountId,
        treasury: AccountId,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        let now = self.tick();
        self.params.treasury = treasury;
        self.record(now, EventKind::TreasuryUpdated { treasury });
        Ok(())
    }
}

impl Round {
    /// Flip `CommitPhase` to `RevealPhase` once the commit deadline passes.
    ///
    /// Deadlines are authoritative; the state field lazily tracks the last
    /// observed phase so reads before the next operation stay cheap.
    pub(crate) fn advance_phase(&mut self, now: Timestamp) {
        if self.state == RoundState::CommitPhase {
            if let Some(commit_deadline) = self.commit_deadline {
                if now >= commit_deadline {
                    self.state = RoundState::RevealPhase;
                }
            }
        }
    }
}
