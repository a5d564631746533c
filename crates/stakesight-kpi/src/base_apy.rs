use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use stakesight_types::StakingConstants;

use crate::error::KpiError;

/// The protocol's nominal yield, derived from constants alone. Cacheable,
/// no user data involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseApy {
    /// Uncapped annualized rate in percent.
    pub simple_apy: Decimal,
    /// Annualized rate in percent after the max-ROI cap.
    pub capped_apy: Decimal,
    /// Reward fraction per day.
    pub daily_rate: Decimal,
    /// Reward fraction per hour.
    pub hourly_rate: Decimal,
    pub max_roi: Decimal,
    /// Days of base-rate accrual until a deposit hits the reward cap.
    pub days_to_max: u64,
}

pub fn base_apy(constants: &StakingConstants) -> Result<BaseApy, KpiError> {
    constants.validate()?;

    let daily_rate = constants.hourly_roi * Decimal::from(24);
    let simple_apy = daily_rate * Decimal::from(365) * Decimal::from(100);

    let days_to_max_dec = ((constants.max_roi - Decimal::ONE) / daily_rate).ceil();
    let days_to_max = days_to_max_dec
        .to_u64()
        .ok_or_else(|| KpiError::CalculationError("days to max out of range".to_string()))?;

    // The cap only ever reduces the nominal rate. When it cannot be reached
    // within a year the simple rate stands; otherwise the annualized rate is
    // implied by hitting the cap early.
    let capped_apy = if days_to_max >= 365 {
        simple_apy
    } else {
        let implied = (constants.max_roi - Decimal::ONE)
            * (Decimal::from(365) / days_to_max_dec)
            * Decimal::from(100);
        implied.min(simple_apy)
    };

    Ok(BaseApy {
        simple_apy,
        capped_apy,
        daily_rate,
        hourly_rate: constants.hourly_roi,
        max_roi: constants.max_roi,
        days_to_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use stakesight_types::ConstantsError;

    #[test]
    fn mainnet_constants_yield_8_76_percent() {
        let base = base_apy(&StakingConstants::default()).unwrap();
        assert_eq!(base.daily_rate, dec!(0.00024));
        assert_eq!(base.simple_apy, dec!(8.76));
        // Cap is 1042 days out, far past a year, so the simple rate stands.
        assert_eq!(base.days_to_max, 1042);
        assert_eq!(base.capped_apy, dec!(8.76));
    }

    #[test]
    fn early_cap_compresses_the_annualized_rate() {
        let constants = StakingConstants {
            hourly_roi: dec!(0.0001),
            ..Default::default()
        };
        let base = base_apy(&constants).unwrap();
        assert_eq!(base.simple_apy, dec!(87.6));
        // daily 0.0024 -> cap of +25% lands on day ceil(104.16) = 105.
        assert_eq!(base.days_to_max, 105);
        // (0.25 * 365/105) * 100, floored by the simple rate.
        assert!(base.capped_apy < base.simple_apy);
        assert_eq!(base.capped_apy.round_dp(4), dec!(86.9048));
    }

    #[test]
    fn invalid_constants_are_a_hard_error() {
        let constants = StakingConstants {
            hourly_roi: Decimal::ZERO,
            ..Default::default()
        };
        let err = base_apy(&constants).unwrap_err();
        assert!(matches!(
            err,
            KpiError::InvalidConstants(ConstantsError::NonPositiveHourlyRoi(_))
        ));
    }
}
