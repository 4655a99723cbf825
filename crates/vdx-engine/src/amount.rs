//! # Amount — Integer Value Units
//!
//! Stakes, bonds, fees, and payouts are carried as `Amount`, a `u128`
//! newtype in smallest currency units. Monetary values must never be
//! floating-point; the canonicalization pipeline rejects floats, and
//! `Amount` serializes as a decimal string so no JSON consumer is tempted
//! to read it as one.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value amount in smallest currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from raw units.
    pub fn new(units: u128) -> Self {
        Self(units)
    }

    /// The raw unit count.
    pub fn units(&self) -> u128 {
        self.0
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Saturating addition. Settlement arithmetic accumulates with this so a
    /// pathological ledger cannot panic mid-settlement; realistic pools sit
    /// far below the 128-bit ceiling.
    pub fn saturating_add(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Floor of `pool * share / total`; zero when `total` is zero.
    ///
    /// Computed as `(pool / total) * share + (pool % total) * share / total`
    /// to keep the intermediate product inside 128 bits for any realistic
    /// pool. The floor's aggregate remainder (dust) is the caller's to route.
    pub fn pro_rata(pool: Amount, share: Amount, total: Amount) -> Amount {
        if total.0 == 0 {
            return Amount::ZERO;
        }
        let quotient = pool.0 / total.0;
        let remainder = pool.0 % total.0;
        Amount(
            quotient
                .saturating_mul(share.0)
                .saturating_add(remainder.saturating_mul(share.0) / total.0),
        )
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>()
            .map(Amount)
            .map_err(|e| serde::de::Error::custom(format!("invalid amount {s:?}: {e}")))
    }
}

impl std::str::FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>().map(Amount)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_arithmetic() {
        assert_eq!(
            Amount::new(3).checked_add(Amount::new(4)),
            Some(Amount::new(7))
        );
        assert_eq!(
            Amount::new(3).checked_sub(Amount::new(4)),
            None
        );
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn pro_rata_exact_split() {
        // Pool 100 split between shares 25 and 75 of a total of 100.
        assert_eq!(
            Amount::pro_rata(Amount::new(100), Amount::new(25), Amount::new(100)),
            Amount::new(25)
        );
        assert_eq!(
            Amount::pro_rata(Amount::new(100), Amount::new(75), Amount::new(100)),
            Amount::new(75)
        );
    }

    #[test]
    fn pro_rata_floors_with_dust() {
        // Pool 10 split three equal ways floors to 3 each; dust of 1 remains.
        let share = Amount::pro_rata(Amount::new(10), Amount::new(1), Amount::new(3));
        assert_eq!(share, Amount::new(3));
    }

    #[test]
    fn pro_rata_zero_total() {
        assert_eq!(
            Amount::pro_rata(Amount::new(10), Amount::new(1), Amount::ZERO),
            Amount::ZERO
        );
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Amount::new(1_000_000)).unwrap();
        assert_eq!(json, "\"1000000\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Amount::new(1_000_000));
    }

    #[test]
    fn serde_rejects_non_numeric() {
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"-5\"").is_err());
    }

    #[test]
    fn display_plain_digits() {
        assert_eq!(format!("{}", Amount::new(42)), "42");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Pro-rata shares over all participants never exceed the pool, and
        /// the shortfall (dust) is strictly less than the participant count.
        #[test]
        fn pro_rata_conserves(
            pool in 0u128..1_000_000_000,
            shares in prop::collection::vec(1u128..1_000_000, 1..10),
        ) {
            let total: u128 = shares.iter().sum();
            let distributed: u128 = shares
                .iter()
                .map(|s| Amount::pro_rata(Amount::new(pool), Amount::new(*s), Amount::new(total)).units())
                .sum();
            prop_assert!(distributed <= pool);
            prop_assert!(pool - distributed < shares.len() as u128);
        }
    }
}
