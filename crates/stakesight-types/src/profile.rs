use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single on-chain deposit, as it appears in the user's current ledger
/// snapshot. Withdrawn deposits are removed upstream before the snapshot is
/// assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Deposit {
    pub const fn new(amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self { amount, timestamp }
    }
}

/// The sole external input to every analysis: one user's ledger snapshot plus
/// the observation time. Assembled fresh per analysis call by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStakingProfile {
    pub deposits: Vec<Deposit>,
    pub total_staked: Decimal,
    pub total_withdrawn: Decimal,
    pub rewards_claimed: Decimal,
    /// Accrued but unclaimed rewards, as reported by the contract.
    pub pending_rewards: Decimal,
    /// Observation timestamp all derived ages are measured against.
    pub now: DateTime<Utc>,
}

impl UserStakingProfile {
    /// Build a profile from the raw ledger, deriving `total_staked` from the
    /// deposit amounts.
    pub fn from_ledger(
        deposits: Vec<Deposit>,
        total_withdrawn: Decimal,
        rewards_claimed: Decimal,
        pending_rewards: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        let total_staked = deposits.iter().map(|d| d.amount).sum();
        Self {
            deposits,
            total_staked,
            total_withdrawn,
            rewards_claimed,
            pending_rewards,
            now,
        }
    }

    /// Whole days elapsed since the earliest deposit; 0 for an empty ledger.
    pub fn staking_days(&self) -> u64 {
        self.deposits
            .iter()
            .map(|d| d.timestamp)
            .min()
            .map_or(0, |earliest| (self.now - earliest).num_days().max(0) as u64)
    }

    pub fn deposit_count(&self) -> usize {
        self.deposits.len()
    }

    pub fn average_deposit(&self) -> Decimal {
        if self.deposits.is_empty() {
            return Decimal::ZERO;
        }
        let total: Decimal = self.deposits.iter().map(|d| d.amount).sum();
        total / Decimal::from(self.deposits.len() as u64)
    }

    /// Lifetime value moved through the program: still staked plus withdrawn.
    pub fn lifetime_value(&self) -> Decimal {
        self.total_staked + self.total_withdrawn
    }

    /// Fraction of lifetime value still staked; 1 when nothing was withdrawn.
    pub fn hold_ratio(&self) -> Decimal {
        let lifetime = self.lifetime_value();
        if lifetime <= Decimal::ZERO {
            return Decimal::ONE;
        }
        self.total_staked / lifetime
    }

    /// Rewards earned over the account's lifetime, claimed or not.
    pub fn total_rewards(&self) -> Decimal {
        self.rewards_claimed + self.pending_rewards
    }

    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty() && self.total_staked <= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    const DAY: i64 = 86_400;

    #[test]
    fn staking_days_floors_from_earliest_deposit() {
        let profile = UserStakingProfile::from_ledger(
            vec![
                Deposit::new(dec!(100), ts(10 * DAY)),
                Deposit::new(dec!(50), ts(40 * DAY)),
            ],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(101 * DAY + 3600),
        );
        assert_eq!(profile.staking_days(), 91);
        assert_eq!(profile.total_staked, dec!(150));
    }

    #[test]
    fn empty_ledger_has_zero_staking_days() {
        let profile = UserStakingProfile::from_ledger(
            vec![],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(DAY),
        );
        assert_eq!(profile.staking_days(), 0);
        assert!(profile.is_empty());
        assert_eq!(profile.average_deposit(), Decimal::ZERO);
    }

    #[test]
    fn hold_ratio_is_one_without_withdrawals() {
        let profile = UserStakingProfile::from_ledger(
            vec![Deposit::new(dec!(1000), ts(0))],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(DAY),
        );
        assert_eq!(profile.hold_ratio(), Decimal::ONE);

        let with_withdrawals = UserStakingProfile {
            total_withdrawn: dec!(1000),
            ..profile
        };
        assert_eq!(with_withdrawals.hold_ratio(), dec!(0.5));
    }
}
