//! # Commit Subcommand
//!
//! Computes the vote commitment a juror submits during the commit phase.
//! The nonce is generated fresh unless one is supplied; jurors must retain
//! it to reveal later.

use clap::Args;
use serde::Serialize;

use vdx_core::{AccountId, ClaimId, RoundIndex};
use vdx_crypto::commitment::{vote_commitment, VoteNonce};

/// Arguments for the commit subcommand.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Claim identifier.
    #[arg(long)]
    pub claim: u64,
    /// Round index within the claim.
    #[arg(long)]
    pub round: u32,
    /// Voter account (64 hex chars).
    #[arg(long)]
    pub voter: String,
    /// The vote to commit to.
    #[arg(long)]
    pub vote: bool,
    /// Reuse an existing nonce (64 hex chars) instead of generating one.
    #[arg(long)]
    pub nonce: Option<String>,
}

/// Printed output: the commitment and the nonce to keep for the reveal.
#[derive(Debug, Serialize)]
struct CommitOutput {
    commitment: String,
    nonce: String,
}

/// Compute and print a vote commitment.
pub fn run(args: CommitArgs) -> anyhow::Result<()> {
    let voter = AccountId::from_hex(&args.voter)?;
    let nonce = match &args.nonce {
        Some(hex) => VoteNonce::from_hex(hex)?,
        None => VoteNonce::random(),
    };
    let commitment = vote_commitment(
        ClaimId(args.claim),
        RoundIndex(args.round),
        &voter,
        args.vote,
        &nonce,
    );
    let output = CommitOutput {
        commitment: commitment.to_hex(),
        nonce: nonce.to_hex(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_nonce_reproduces_engine_commitment() {
        let voter = AccountId::from_key_bytes(&[3u8; 32]);
        let nonce = VoteNonce::from_bytes([9u8; 32]);
        let expected = vote_commitment(ClaimId(4), RoundIndex(1), &voter, true, &nonce);

        // The CLI path goes through hex parsing; it must land on the same digest.
        let parsed_voter = AccountId::from_hex(&voter.to_hex()).unwrap();
        let parsed_nonce = VoteNonce::from_hex(&nonce.to_hex()).unwrap();
        let actual = vote_commitment(ClaimId(4), RoundIndex(1), &parsed_voter, true, &parsed_nonce);
        assert_eq!(actual, expected);
    }
}
