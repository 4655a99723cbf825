//! # Commit-Reveal Vote Ledger
//!
//! Per-round, per-voter vote records and the stake-weighted tally. A record
//! is created at commit time with the hiding digest and stake; the reveal
//! phase flips it to a revealed status, and resolution marks whatever stayed
//! hidden as forfeited.

use serde::{Deserialize, Serialize};

use vdx_core::{ContentDigest, Timestamp};

use crate::amount::Amount;
use crate::claim::Verdict;

/// Where a vote record stands in the commit-reveal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealStatus {
    /// Committed, not yet revealed.
    Unrevealed,
    /// Revealed as a vote for the claim.
    RevealedTrue,
    /// Revealed as a vote against the claim.
    RevealedFalse,
    /// Never revealed before resolution; stake forfeits to the winners' pool.
    Forfeited,
}

impl RevealStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unrevealed => "UNREVEALED",
            Self::RevealedTrue => "REVEALED_TRUE",
            Self::RevealedFalse => "REVEALED_FALSE",
            Self::Forfeited => "FORFEITED",
        }
    }

    /// The revealed vote, if any.
    pub fn revealed_vote(&self) -> Option<bool> {
        match self {
            Self::RevealedTrue => Some(true),
            Self::RevealedFalse => Some(false),
            Self::Unrevealed | Self::Forfeited => None,
        }
    }
}

impl std::fmt::Display for RevealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One voter's record within a round.
///
/// The commitment is set exactly once at commit time and never changes.
/// Reveal and reward-claim are the only mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The hiding commitment digest.
    pub commitment: ContentDigest,
    /// Stake backing the vote.
    pub stake: Amount,
    /// Current reveal status.
    pub status: RevealStatus,
    /// When the commitment was recorded.
    pub committed_at: Timestamp,
    /// When the reveal happened, if it did.
    pub revealed_at: Option<Timestamp>,
    /// Whether the voter has claimed their settlement payout.
    pub reward_claimed: bool,
}

impl VoteRecord {
    /// Create a fresh unrevealed record.
    pub fn new(commitment: ContentDigest, stake: Amount, committed_at: Timestamp) -> Self {
        Self {
            commitment,
            stake,
            status: RevealStatus::Unrevealed,
            committed_at,
            revealed_at: None,
            reward_claimed: false,
        }
    }
}

/// Stake-weighted tally of a round's revealed votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Summed stake of revealed votes for the claim.
    pub stake_true: Amount,
    /// Summed stake of revealed votes against the claim.
    pub stake_false: Amount,
    /// Number of revealed votes.
    pub revealed_count: u32,
}

impl Tally {
    /// Tally a set of vote records.
    pub fn from_votes<'a>(votes: impl Iterator<Item = &'a VoteRecord>) -> Self {
        let mut tally = Self {
            stake_true: Amount::ZERO,
            stake_false: Amount::ZERO,
            revealed_count: 0,
        };
        for record in votes {
            match record.status.revealed_vote() {
                Some(true) => {
                    tally.stake_true = tally.stake_true.saturating_add(record.stake);
                    tally.revealed_count += 1;
                }
                Some(false) => {
                    tally.stake_false = tally.stake_false.saturating_add(record.stake);
                    tally.revealed_count += 1;
                }
                None => {}
            }
        }
        tally
    }

    /// The verdict this tally yields.
    ///
    /// The side with strictly greater summed stake wins; a tie resolves to
    /// `False` — the conservative default favoring the disputing side's null
    /// hypothesis.
    pub fn verdict(&self) -> Verdict {
        if self.stake_true > self.stake_false {
            Verdict::True
        } else {
            Verdict::False
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(tag: u8) -> ContentDigest {
        ContentDigest::from_bytes([tag; 32])
    }

    fn ts() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn record(stake: u128, status: RevealStatus) -> VoteRecord {
        let mut r = VoteRecord::new(digest(1), Amount::new(stake), ts());
        r.status = status;
        r
    }

    #[test]
    fn fresh_record_is_unrevealed() {
        let r = VoteRecord::new(digest(1), Amount::new(5), ts());
        assert_eq!(r.status, RevealStatus::Unrevealed);
        assert!(!r.reward_claimed);
        assert!(r.revealed_at.is_none());
    }

    #[test]
    fn tally_sums_by_side() {
        let votes = [
            record(3, RevealStatus::RevealedTrue),
            record(2, RevealStatus::RevealedTrue),
            record(4, RevealStatus::RevealedFalse),
            record(9, RevealStatus::Unrevealed),
            record(7, RevealStatus::Forfeited),
        ];
        let tally = Tally::from_votes(votes.iter());
        assert_eq!(tally.stake_true, Amount::new(5));
        assert_eq!(tally.stake_false, Amount::new(4));
        assert_eq!(tally.revealed_count, 3);
    }

    #[test]
    fn strictly_greater_true_wins() {
        let votes = [
            record(5, RevealStatus::RevealedTrue),
            record(4, RevealStatus::RevealedFalse),
        ];
        assert_eq!(Tally::from_votes(votes.iter()).verdict(), Verdict::True);
    }

    #[test]
    fn tie_resolves_false() {
        let votes = [
            record(4, RevealStatus::RevealedTrue),
            record(4, RevealStatus::RevealedFalse),
        ];
        assert_eq!(Tally::from_votes(votes.iter()).verdict(), Verdict::False);
    }

    #[test]
    fn unrevealed_stake_never_counts() {
        // A huge unrevealed stake on the true side cannot flip the verdict.
        let votes = [
            record(1_000_000, RevealStatus::Unrevealed),
            record(1, RevealStatus::RevealedFalse),
        ];
        let tally = Tally::from_votes(votes.iter());
        assert_eq!(tally.stake_true, Amount::ZERO);
        assert_eq!(tally.verdict(), Verdict::False);
    }

    #[test]
    fn status_display() {
        assert_eq!(RevealStatus::Unrevealed.as_str(), "UNREVEALED");
        assert_eq!(RevealStatus::RevealedTrue.as_str(), "REVEALED_TRUE");
        assert_eq!(RevealStatus::RevealedFalse.as_str(), "REVEALED_FALSE");
        assert_eq!(RevealStatus::Forfeited.as_str(), "FORFEITED");
    }

    #[test]
    fn record_serde_roundtrip() {
        let r = record(12, RevealStatus::RevealedTrue);
        let json = serde_json::to_string(&r).unwrap();
        let parsed: VoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, r);
    }
}
