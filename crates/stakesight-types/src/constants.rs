use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstantsError {
    #[error("hourly ROI must be positive, got {0}")]
    NonPositiveHourlyRoi(Decimal),
    #[error("max ROI multiplier must exceed 1, got {0}")]
    MaxRoiNotAboveOne(Decimal),
    #[error("time bonus tiers must be sorted ascending by days")]
    UnsortedTimeBonusTiers,
    #[error("min deposit {min} exceeds max deposit {max}")]
    InvertedDepositBounds { min: Decimal, max: Decimal },
}

/// One step of the loyalty schedule: deposits older than `days` earn `bonus`
/// (0.01 = +1%) on top of the base rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBonusTier {
    pub days: u64,
    pub bonus: Decimal,
}

/// Protocol parameters read from the staking contract.
///
/// Injected into every entry point; never held as process-wide state. A value
/// that fails `validate` is the only input the analytics core refuses to work
/// with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakingConstants {
    /// Reward rate per hour as a fraction of the stake (0.00001 = 0.001%/h).
    pub hourly_roi: Decimal,
    /// Cumulative reward cap as a multiplier of the principal (1.25 = +25%).
    pub max_roi: Decimal,
    /// Protocol commission on paid-out rewards (0.05 = 5%).
    pub commission_rate: Decimal,
    pub min_deposit: Decimal,
    pub max_deposit: Decimal,
    pub max_deposits_per_user: u32,
    pub basis_points: u32,
    /// Must be sorted ascending by `days`.
    pub time_bonus_tiers: Vec<TimeBonusTier>,
}

impl StakingConstants {
    pub fn validate(&self) -> Result<(), ConstantsError> {
        if self.hourly_roi <= Decimal::ZERO {
            return Err(ConstantsError::NonPositiveHourlyRoi(self.hourly_roi));
        }
        if self.max_roi <= Decimal::ONE {
            return Err(ConstantsError::MaxRoiNotAboveOne(self.max_roi));
        }
        if self.min_deposit > self.max_deposit {
            return Err(ConstantsError::InvertedDepositBounds {
                min: self.min_deposit,
                max: self.max_deposit,
            });
        }
        if self
            .time_bonus_tiers
            .windows(2)
            .any(|w| w[0].days >= w[1].days)
        {
            return Err(ConstantsError::UnsortedTimeBonusTiers);
        }
        Ok(())
    }
}

impl Default for StakingConstants {
    /// The published mainnet parameters.
    fn default() -> Self {
        Self {
            hourly_roi: Decimal::new(1, 5),
            max_roi: Decimal::new(125, 2),
            commission_rate: Decimal::new(5, 2),
            min_deposit: Decimal::from(10),
            max_deposit: Decimal::from(1_000_000),
            max_deposits_per_user: 100,
            basis_points: 10_000,
            time_bonus_tiers: vec![
                TimeBonusTier {
                    days: 90,
                    bonus: Decimal::new(1, 2),
                },
                TimeBonusTier {
                    days: 180,
                    bonus: Decimal::new(2, 2),
                },
                TimeBonusTier {
                    days: 365,
                    bonus: Decimal::new(5, 2),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn default_constants_are_valid() {
        assert_eq!(StakingConstants::default().validate(), Ok(()));
        assert_eq!(StakingConstants::default().hourly_roi, dec!(0.00001));
    }

    #[test]
    fn non_positive_hourly_roi_is_rejected() {
        let constants = StakingConstants {
            hourly_roi: Decimal::ZERO,
            ..Default::default()
        };
        assert_eq!(
            constants.validate(),
            Err(ConstantsError::NonPositiveHourlyRoi(Decimal::ZERO))
        );
    }

    #[test]
    fn max_roi_must_exceed_one() {
        let constants = StakingConstants {
            max_roi: Decimal::ONE,
            ..Default::default()
        };
        assert_eq!(
            constants.validate(),
            Err(ConstantsError::MaxRoiNotAboveOne(Decimal::ONE))
        );
    }

    #[test]
    fn unsorted_tiers_are_rejected() {
        let mut constants = StakingConstants::default();
        constants.time_bonus_tiers.swap(0, 2);
        assert_eq!(
            constants.validate(),
            Err(ConstantsError::UnsortedTimeBonusTiers)
        );
    }
}
