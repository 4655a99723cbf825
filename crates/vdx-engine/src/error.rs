//! # Engine Error Types
//!
//! Structured error hierarchy for the dispute engine. Every variant carries
//! diagnostic context: the claim and round involved, the state at the time
//! of failure, and actionable information for callers.
//!
//! The full set is exhaustively enumerable and every error is returned
//! synchronously — a rejected operation leaves no partial state behind.
//! [`EngineError::kind`] classifies each variant into the four top-level
//! categories callers dispatch on.

use thiserror::Error;

use vdx_core::{AccountId, ClaimId, RoundIndex, Timestamp};

/// Top-level classification of an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input; never mutates state.
    Validation,
    /// Operation invalid for the current round/claim phase.
    State,
    /// Caller or signer lacks the required authority.
    Authorization,
    /// Signature or expiry failure on submitted evidence.
    Verification,
}

/// Errors arising from dispute engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    // ── Validation ─────────────────────────────────────────────────────
    /// Parameter update rejected (non-positive duration, quorum below 1).
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// Why the parameter set was rejected.
        reason: String,
    },

    /// A vote commit carried no stake.
    #[error("stake must be nonzero for {voter} on {claim_id} {round_index}")]
    ZeroStake {
        /// The claim being voted on.
        claim_id: ClaimId,
        /// The round being voted on.
        round_index: RoundIndex,
        /// The committing voter.
        voter: AccountId,
    },

    /// A round-opening or appeal bond was zero.
    #[error("bond must be nonzero for {caller} on {claim_id}")]
    ZeroBond {
        /// The claim being bonded.
        claim_id: ClaimId,
        /// The bonding caller.
        caller: AccountId,
    },

    /// Canonicalization failed while reconstructing a signed message.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] vdx_core::CanonicalizationError),

    // ── State ──────────────────────────────────────────────────────────
    /// No claim exists with the given identifier.
    #[error("unknown claim {claim_id}")]
    UnknownClaim {
        /// The missing claim identifier.
        claim_id: ClaimId,
    },

    /// No round exists at the given index for the claim.
    #[error("unknown round {round_index} on {claim_id}")]
    UnknownRound {
        /// The claim queried.
        claim_id: ClaimId,
        /// The missing round index.
        round_index: RoundIndex,
    },

    /// Operation not valid for the round's current state or deadlines.
    #[error("{operation} invalid for {claim_id} {round_index} in state {state}: {reason}")]
    InvalidTransition {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The round's current state name.
        state: String,
        /// The attempted operation.
        operation: &'static str,
        /// Why the operation was rejected.
        reason: String,
    },

    /// Reopening a claim before its cooldown has elapsed.
    #[error("cooldown active on {claim_id}; ready at {ready_at}")]
    CooldownActive {
        /// The claim being reopened.
        claim_id: ClaimId,
        /// When reopening becomes permitted.
        ready_at: Timestamp,
    },

    /// A voter already holds a commitment for this round.
    #[error("{voter} already committed on {claim_id} {round_index}")]
    AlreadyCommitted {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The duplicate committer.
        voter: AccountId,
    },

    /// A voter attempted to reveal without a recorded commitment.
    #[error("no commitment recorded for {voter} on {claim_id} {round_index}")]
    NoCommitment {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The revealing voter.
        voter: AccountId,
    },

    /// A voter already revealed in this round.
    #[error("{voter} already revealed on {claim_id} {round_index}")]
    AlreadyRevealed {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The revealing voter.
        voter: AccountId,
    },

    /// The revealed (vote, nonce) tuple does not reproduce the commitment.
    #[error("commitment mismatch for {voter} on {claim_id} {round_index}")]
    CommitmentMismatch {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The revealing voter.
        voter: AccountId,
    },

    /// Settlement attempted before the round reached a final state.
    #[error("{claim_id} {round_index} is not final (state {state})")]
    RoundNotFinal {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The round's current state name.
        state: String,
    },

    /// A participant already claimed their payout for this round.
    #[error("{account} already claimed payout for {claim_id} {round_index}")]
    AlreadyClaimed {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The double-claiming participant.
        account: AccountId,
    },

    /// The caller contributed nothing to the round being settled.
    #[error("{account} is not a participant of {claim_id} {round_index}")]
    NotAParticipant {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The non-participant caller.
        account: AccountId,
    },

    /// The claim has exhausted its appeal allowance.
    #[error("appeal limit reached on {claim_id} (max {max_appeals})")]
    AppealLimitReached {
        /// The claim involved.
        claim_id: ClaimId,
        /// The configured ceiling.
        max_appeals: u32,
    },

    /// The appeal payment does not cover the configured fee.
    #[error("appeal fee insufficient on {claim_id}: required {required}, provided {provided}")]
    InsufficientAppealFee {
        /// The claim involved.
        claim_id: ClaimId,
        /// The configured appeal fee.
        required: String,
        /// The payment offered.
        provided: String,
    },

    /// An attestation with the same identity was already recorded.
    #[error("evidence already recorded for {provider} ({kind}) on {claim_id} {round_index}")]
    EvidenceAlreadyRecorded {
        /// The claim involved.
        claim_id: ClaimId,
        /// The round involved.
        round_index: RoundIndex,
        /// The attesting provider.
        provider: AccountId,
        /// The evidence kind.
        kind: String,
    },

    // ── Authorization ──────────────────────────────────────────────────
    /// A privileged operation was called by a non-administrator.
    #[error("{caller} is not the administrator")]
    NotAdministrator {
        /// The unauthorized caller.
        caller: AccountId,
    },

    /// The first bond on a claim must come from its claimant.
    #[error("{caller} is not the claimant of {claim_id}")]
    NotClaimant {
        /// The claim involved.
        claim_id: ClaimId,
        /// The unauthorized caller.
        caller: AccountId,
    },

    /// The attestation signer is neither the oracle nor an approved provider.
    #[error("provider {provider} not approved for evidence kind {kind}")]
    ProviderNotApproved {
        /// The recovered signer account.
        provider: AccountId,
        /// The evidence kind the signer attested to.
        kind: String,
    },

    // ── Verification ───────────────────────────────────────────────────
    /// The attestation signature does not verify.
    #[error("evidence signature invalid: {reason}")]
    SignatureInvalid {
        /// The underlying verification failure.
        reason: String,
    },

    /// The attestation expired before verification.
    #[error("evidence expired at {expires_at} (verified at {now})")]
    ExpiredEvidence {
        /// The attestation's expiry.
        expires_at: Timestamp,
        /// The verification time.
        now: Timestamp,
    },
}

impl EngineError {
    /// Classify this error into the four top-level categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters { .. }
            | Self::ZeroStake { .. }
            | Self::ZeroBond { .. }
            | Self::Canonicalization(_) => ErrorKind::Validation,

            Self::UnknownClaim { .. }
            | Self::UnknownRound { .. }
            | Self::InvalidTransition { .. }
            | Self::CooldownActive { .. }
            | Self::AlreadyCommitted { .. }
            | Self::NoCommitment { .. }
            | Self::AlreadyRevealed { .. }
            | Self::CommitmentMismatch { .. }
            | Self::RoundNotFinal { .. }
            | Self::AlreadyClaimed { .. }
            | Self::NotAParticipant { .. }
            | Self::AppealLimitReached { .. }
            | Self::InsufficientAppealFee { .. }
            | Self::EvidenceAlreadyRecorded { .. } => ErrorKind::State,

            Self::NotAdministrator { .. }
            | Self::NotClaimant { .. }
            | Self::ProviderNotApproved { .. } => ErrorKind::Authorization,

            Self::SignatureInvalid { .. } | Self::ExpiredEvidence { .. } => {
                ErrorKind::Verification
            }
        }
    }
}
