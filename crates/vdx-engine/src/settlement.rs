//! # Settlement — Payout and Refund Computation
//!
//! Once a round is final, each participant may claim exactly one payout.
//! The figures are fixed at finalization in a [`SettlementSheet`] so every
//! later claim reads the same numbers regardless of claiming order.
//!
//! ## Value Conservation
//!
//! For a resolved round, the sum of all payouts plus the treasury transfer
//! equals the sum of all stakes, bonds, and fees paid into the round.
//! Winners' shares use floor division; the aggregate remainder (dust) is
//! folded into the treasury transfer at finalization, so conservation is
//! exact and payouts commute.

use serde::{Deserialize, Serialize};

use vdx_core::{AccountId, ClaimId, RoundIndex};

use crate::amount::Amount;
use crate::claim::{Round, Verdict};
use crate::vote::RevealStatus;

/// Settlement figures fixed when a round becomes final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSheet {
    /// Whether the round's revealed-vote count met its quorum snapshot.
    pub quorum_met: bool,
    /// The round's verdict (`Undetermined` for voided rounds).
    pub verdict: Verdict,
    /// Total stake revealed on the winning side.
    pub winning_stake: Amount,
    /// Forfeited stake: losing reveals plus never-revealed commitments.
    pub losing_pool: Amount,
    /// Value routed to the treasury: losing-side bonds, appeal fee, dust.
    pub treasury_transfer: Amount,
}

/// A computed payout for one participant of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// The paid participant.
    pub account: AccountId,
    /// The settled claim.
    pub claim_id: ClaimId,
    /// The settled round.
    pub round_index: RoundIndex,
    /// Amount owed to the participant. Zero for losing-side participants.
    pub amount: Amount,
}

/// The reveal status that counts as a win under the given verdict.
fn winning_status(verdict: Verdict) -> Option<RevealStatus> {
    match verdict {
        Verdict::True => Some(RevealStatus::RevealedTrue),
        Verdict::False => Some(RevealStatus::RevealedFalse),
        Verdict::Undetermined => None,
    }
}

/// Build the settlement sheet for a round that resolved with quorum.
///
/// Call only after unrevealed votes have been flipped to `Forfeited`.
pub(crate) fn resolved_sheet(round: &Round, verdict: Verdict) -> SettlementSheet {
    let winner = winning_status(verdict);
    let mut winning_stake = Amount::ZERO;
    let mut losing_pool = Amount::ZERO;
    for record in round.votes.values() {
        if Some(record.status) == winner {
            winning_stake = winning_stake.saturating_add(record.stake);
        } else {
            losing_pool = losing_pool.saturating_add(record.stake);
        }
    }

    // Aggregate dust left behind by floor division of the winners' shares.
    let mut distributed = Amount::ZERO;
    for record in round.votes.values() {
        if Some(record.status) == winner {
            distributed = distributed.saturating_add(Amount::pro_rata(
                losing_pool,
                record.stake,
                winning_stake,
            ));
        }
    }
    let dust = losing_pool
        .checked_sub(distributed)
        .unwrap_or(Amount::ZERO);

    let losing_bonds = match verdict {
        Verdict::True => round.disputer_bond_total(),
        Verdict::False => round.claimant_bond,
        Verdict::Undetermined => Amount::ZERO,
    };
    // With no winners the whole forfeited pool is undistributable.
    let undistributable = if winning_stake.is_zero() {
        losing_pool
    } else {
        dust
    };

    SettlementSheet {
        quorum_met: true,
        verdict,
        winning_stake,
        losing_pool,
        treasury_transfer: losing_bonds
            .saturating_add(round.appeal_fee)
            .saturating_add(undistributable),
    }
}

/// Build the settlement sheet for a round voided for lack of quorum.
pub(crate) fn voided_sheet() -> SettlementSheet {
    SettlementSheet {
        quorum_met: false,
        verdict: Verdict::Undetermined,
        winning_stake: Amount::ZERO,
        losing_pool: Amount::ZERO,
        treasury_transfer: Amount::ZERO,
    }
}

/// Compute the payout owed to a participant under a fixed sheet.
///
/// Returns the total across every role the account held in the round
/// (voter, bond poster, appellant). The caller is responsible for the
/// participant and double-claim checks.
pub(crate) fn payout_amount(round: &Round, sheet: &SettlementSheet, account: &AccountId) -> Amount {
    if !sheet.quorum_met {
        // Voided round: everyone recovers exactly their own contribution.
        return round.contribution_of(account);
    }

    let winner = winning_status(sheet.verdict);
    let mut amount = Amount::ZERO;

    if let Some(record) = round.votes.get(account) {
        if Some(record.status) == winner {
            amount = amount
                .saturating_add(record.stake)
                .saturating_add(Amount::pro_rata(
                    sheet.losing_pool,
                    record.stake,
                    sheet.winning_stake,
                ));
        }
    }

    match sheet.verdict {
        Verdict::True => {
            if account == &round.claimant {
                amount = amount.saturating_add(round.claimant_bond);
            }
        }
        Verdict::False => {
            if let Some(bond) = round.disputer_bonds.get(account) {
                amount = amount.saturating_add(*bond);
            }
        }
        Verdict::Undetermined => {}
    }

    amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdx_core::{ContentDigest, Timestamp};

    use crate::vote::VoteRecord;

    fn account(tag: u8) -> AccountId {
        AccountId::from_key_bytes(&[tag; 32])
    }

    fn ts() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn vote(stake: u128, status: RevealStatus) -> VoteRecord {
        let mut record = VoteRecord::new(ContentDigest::from_bytes([9; 32]), Amount::new(stake), ts());
        record.status = status;
        record
    }

    /// Claimant bonds 100; disputer bonds 80; three voters.
    fn resolved_round() -> Round {
        let mut round = Round::open(
            ClaimId(0),
            RoundIndex(0),
            account(1),
            Amount::new(100),
            2,
            ts(),
        );
        round.disputer_bonds.insert(account(2), Amount::new(80));
        round
            .votes
            .insert(account(10), vote(30, RevealStatus::RevealedTrue));
        round
            .votes
            .insert(account(11), vote(10, RevealStatus::RevealedTrue));
        round
            .votes
            .insert(account(12), vote(20, RevealStatus::RevealedFalse));
        round
    }

    #[test]
    fn sheet_pools_split_by_side() {
        let round = resolved_round();
        let sheet = resolved_sheet(&round, Verdict::True);
        assert_eq!(sheet.winning_stake, Amount::new(40));
        assert_eq!(sheet.losing_pool, Amount::new(20));
        // Disputer bond 80 forfeits; 20 splits 30:10 with no dust.
        assert_eq!(sheet.treasury_transfer, Amount::new(80));
    }

    #[test]
    fn winner_payouts_are_pro_rata() {
        let round = resolved_round();
        let sheet = resolved_sheet(&round, Verdict::True);
        assert_eq!(
            payout_amount(&round, &sheet, &account(10)),
            Amount::new(30 + 15)
        );
        assert_eq!(
            payout_amount(&round, &sheet, &account(11)),
            Amount::new(10 + 5)
        );
        // Losing voter recovers nothing.
        assert_eq!(payout_amount(&round, &sheet, &account(12)), Amount::ZERO);
    }

    #[test]
    fn winning_side_bond_returns() {
        let round = resolved_round();
        let sheet = resolved_sheet(&round, Verdict::True);
        assert_eq!(payout_amount(&round, &sheet, &account(1)), Amount::new(100));
        assert_eq!(payout_amount(&round, &sheet, &account(2)), Amount::ZERO);

        let sheet = resolved_sheet(&round, Verdict::False);
        assert_eq!(payout_amount(&round, &sheet, &account(1)), Amount::ZERO);
        assert_eq!(payout_amount(&round, &sheet, &account(2)), Amount::new(80));
    }

    #[test]
    fn forfeited_stake_joins_losing_pool() {
        let mut round = resolved_round();
        round
            .votes
            .insert(account(13), vote(40, RevealStatus::Forfeited));
        let sheet = resolved_sheet(&round, Verdict::True);
        assert_eq!(sheet.losing_pool, Amount::new(60));
        assert_eq!(payout_amount(&round, &sheet, &account(13)), Amount::ZERO);
    }

    #[test]
    fn dust_goes_to_treasury_and_conservation_holds() {
        let mut round = Round::open(
            ClaimId(0),
            RoundIndex(0),
            account(1),
            Amount::new(100),
            2,
            ts(),
        );
        round.disputer_bonds.insert(account(2), Amount::new(50));
        // Losing pool of 10 splits across winners 3 and 4 (total 7): floor
        // shares 4 + 5 = 9, dust 1.
        round
            .votes
            .insert(account(10), vote(3, RevealStatus::RevealedTrue));
        round
            .votes
            .insert(account(11), vote(4, RevealStatus::RevealedTrue));
        round
            .votes
            .insert(account(12), vote(10, RevealStatus::RevealedFalse));

        let sheet = resolved_sheet(&round, Verdict::True);
        assert_eq!(sheet.treasury_transfer, Amount::new(50 + 1));

        let total_in = Amount::new(3 + 4 + 10 + 100 + 50);
        let total_out: Amount = round
            .participants()
            .iter()
            .fold(Amount::ZERO, |acc, p| {
                acc.saturating_add(payout_amount(&round, &sheet, p))
            })
            .saturating_add(sheet.treasury_transfer);
        assert_eq!(total_out, total_in);
    }

    #[test]
    fn voided_round_refunds_contributions() {
        let mut round = resolved_round();
        round.appellant = Some(account(2));
        round.appeal_fee = Amount::new(7);
        let sheet = voided_sheet();
        assert_eq!(sheet.treasury_transfer, Amount::ZERO);
        assert_eq!(payout_amount(&round, &sheet, &account(1)), Amount::new(100));
        // Disputer bond plus appeal fee.
        assert_eq!(payout_amount(&round, &sheet, &account(2)), Amount::new(87));
        assert_eq!(payout_amount(&round, &sheet, &account(12)), Amount::new(20));
    }

    #[test]
    fn no_winners_routes_pool_to_treasury() {
        let mut round = Round::open(
            ClaimId(0),
            RoundIndex(0),
            account(1),
            Amount::new(100),
            1,
            ts(),
        );
        // Only reveal is on the false side; verdict False, no true stake.
        round
            .votes
            .insert(account(10), vote(10, RevealStatus::RevealedFalse));
        round
            .votes
            .insert(account(11), vote(25, RevealStatus::Forfeited));
        let sheet = resolved_sheet(&round, Verdict::False);
        assert_eq!(sheet.winning_stake, Amount::new(10));
        assert_eq!(sheet.losing_pool, Amount::new(25));
        // Claimant bond forfeits; winner takes whole pool, no dust.
        assert_eq!(sheet.treasury_transfer, Amount::new(100));
        assert_eq!(
            payout_amount(&round, &sheet, &account(10)),
            Amount::new(10 + 25)
        );
    }

    #[test]
    fn appeal_fee_routes_to_treasury_on_resolution() {
        let mut round = resolved_round();
        round.appellant = Some(account(2));
        round.appeal_fee = Amount::new(7);
        let sheet = resolved_sheet(&round, Verdict::True);
        assert_eq!(sheet.treasury_transfer, Amount::new(80 + 7));
        // The appellant's fee is not refunded on a resolved round.
        assert_eq!(payout_amount(&round, &sheet, &account(2)), Amount::ZERO);
    }
}
