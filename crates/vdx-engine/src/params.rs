//! # Engine Parameters
//!
//! Tunable timing, quorum, fee, and role configuration. Initialized at
//! engine construction, updateable only by the administrator, and read by
//! every other component.
//!
//! Rounds snapshot the values they depend on (deadlines, quorum) at their
//! own creation time, so a parameter change never retroactively alters an
//! in-flight round.

use serde::{Deserialize, Serialize};

use vdx_core::AccountId;

use crate::amount::Amount;
use crate::error::EngineError;

/// Process-wide engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Seconds a claim must rest after a round terminates before it can be
    /// disputed again.
    pub cooldown_secs: u64,
    /// Duration of the commit window in seconds.
    pub commit_window_secs: u64,
    /// Duration of the reveal window in seconds.
    pub reveal_window_secs: u64,
    /// Minimum number of revealed votes for a tally to be binding.
    pub min_quorum: u32,
    /// Fee charged to open an appeal round.
    pub appeal_fee: Amount,
    /// Maximum number of appeals per claim.
    pub max_appeals: u32,
    /// Privileged key whose evidence signatures are trusted without
    /// per-kind provider approval.
    pub oracle_signer: AccountId,
    /// Account receiving forfeited bonds, appeal fees, and split dust.
    pub treasury: AccountId,
}

impl Parameters {
    /// Check the structural constraints on a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameters`] for non-positive windows or
    /// cooldown, or a quorum below 1.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.commit_window_secs == 0 {
            return Err(EngineError::InvalidParameters {
                reason: "commit window must be positive".to_string(),
            });
        }
        if self.reveal_window_secs == 0 {
            return Err(EngineError::InvalidParameters {
                reason: "reveal window must be positive".to_string(),
            });
        }
        if self.cooldown_secs == 0 {
            return Err(EngineError::InvalidParameters {
                reason: "cooldown must be positive".to_string(),
            });
        }
        if self.min_quorum < 1 {
            return Err(EngineError::InvalidParameters {
                reason: "minimum quorum must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(tag: u8) -> AccountId {
        AccountId::from_key_bytes(&[tag; 32])
    }

    fn valid_params() -> Parameters {
        Parameters {
            cooldown_secs: 60,
            commit_window_secs: 180,
            reveal_window_secs: 120,
            min_quorum: 3,
            appeal_fee: Amount::new(20_000),
            max_appeals: 3,
            oracle_signer: account(1),
            treasury: account(2),
        }
    }

    #[test]
    fn valid_params_accepted() {
        assert!(valid_params().validate().is_ok());
    }

    #[test]
    fn zero_commit_window_rejected() {
        let mut p = valid_params();
        p.commit_window_secs = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_reveal_window_rejected() {
        let mut p = valid_params();
        p.reveal_window_secs = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_cooldown_rejected() {
        let mut p = valid_params();
        p.cooldown_secs = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_quorum_rejected() {
        let mut p = valid_params();
        p.min_quorum = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_appeal_fee_permitted() {
        // Fee-free appeals are a policy choice, not a structural defect.
        let mut p = valid_params();
        p.appeal_fee = Amount::ZERO;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn serde_roundtrip() {
        let p = valid_params();
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }
}
