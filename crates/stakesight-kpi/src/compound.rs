use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundProjection {
    pub final_amount: Decimal,
    pub total_rewards: Decimal,
    /// Total rewards as a fraction of the principal.
    pub effective_rate: Decimal,
    pub reached_max: bool,
    /// Day the reward cap was hit, when it was.
    pub days_to_max: Option<u64>,
}

impl CompoundProjection {
    fn identity(principal: Decimal, reached_max: bool) -> Self {
        Self {
            final_amount: principal,
            total_rewards: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            reached_max,
            days_to_max: if reached_max { Some(0) } else { None },
        }
    }
}

/// Simulate day-by-day compounding under the cumulative reward cap
/// `principal * (max_roi - 1)`.
///
/// The explicit day loop is the contract: the cap makes growth piecewise and
/// every consumer must observe identical day-granular rounding. Once the cap
/// is hit the simulation halts; rewards never exceed the cap.
pub fn project(
    principal: Decimal,
    daily_rate: Decimal,
    days: u64,
    max_roi: Decimal,
) -> CompoundProjection {
    if days == 0 || principal <= Decimal::ZERO || daily_rate <= Decimal::ZERO {
        return CompoundProjection::identity(principal.max(Decimal::ZERO), false);
    }
    let reward_cap = principal * (max_roi - Decimal::ONE);
    if reward_cap <= Decimal::ZERO {
        return CompoundProjection::identity(principal, true);
    }

    let mut current = principal;
    let mut total_rewards = Decimal::ZERO;
    let mut reached_max = false;
    let mut days_to_max = None;

    for day in 1..=days {
        let reward = current * daily_rate;
        if total_rewards + reward >= reward_cap {
            total_rewards = reward_cap;
            current = principal + reward_cap;
            reached_max = true;
            days_to_max = Some(day);
            break;
        }
        total_rewards += reward;
        current += reward;
    }

    CompoundProjection {
        final_amount: current,
        total_rewards,
        effective_rate: total_rewards / principal,
        reached_max,
        days_to_max,
    }
}

/// Days of compounding until a deposit stops earning. `None` when the inputs
/// cannot reach the cap.
pub fn days_to_cap(principal: Decimal, daily_rate: Decimal, max_roi: Decimal) -> Option<u64> {
    if principal <= Decimal::ZERO || daily_rate <= Decimal::ZERO || max_roi <= Decimal::ONE {
        return None;
    }
    // Compounding reaches the cap no later than simple interest would, so the
    // simple-interest bound is a sufficient simulation horizon.
    let horizon = ((max_roi - Decimal::ONE) / daily_rate).ceil().to_u64()?;
    project(principal, daily_rate, horizon, max_roi).days_to_max
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn rewards_never_exceed_the_cap() {
        let projection = project(dec!(1000), dec!(0.01), 10_000, dec!(1.25));
        assert!(projection.reached_max);
        assert_eq!(projection.total_rewards, dec!(250));
        assert_eq!(projection.final_amount, dec!(1250));
        assert_eq!(projection.effective_rate, dec!(0.25));
    }

    #[test]
    fn cap_day_matches_compound_growth() {
        // 1% daily compounding needs 23 days to clear +25%:
        // 1.01^22 = 1.2447, 1.01^23 = 1.2572.
        let projection = project(dec!(1000), dec!(0.01), 365, dec!(1.25));
        assert_eq!(projection.days_to_max, Some(23));
        assert_eq!(days_to_cap(dec!(1000), dec!(0.01), dec!(1.25)), Some(23));
    }

    #[test]
    fn below_cap_growth_compounds_daily() {
        let projection = project(dec!(1000), dec!(0.001), 3, dec!(1.25));
        assert!(!projection.reached_max);
        assert_eq!(projection.days_to_max, None);
        // 1000 * 1.001^3, accumulated day by day.
        let expected = dec!(1000) * dec!(1.001) * dec!(1.001) * dec!(1.001) - dec!(1000);
        assert_eq!(projection.total_rewards, expected);
        assert_eq!(projection.final_amount, dec!(1000) + expected);
    }

    #[test]
    fn degenerate_inputs_return_the_identity() {
        for projection in [
            project(dec!(1000), dec!(0.001), 0, dec!(1.25)),
            project(dec!(0), dec!(0.001), 30, dec!(1.25)),
            project(dec!(1000), dec!(0), 30, dec!(1.25)),
        ] {
            assert_eq!(projection.total_rewards, Decimal::ZERO);
            assert!(!projection.reached_max);
        }
        assert_eq!(days_to_cap(dec!(0), dec!(0.01), dec!(1.25)), None);
        assert_eq!(days_to_cap(dec!(1000), dec!(0.01), dec!(1)), None);
    }

    #[test]
    fn reaching_max_pins_rewards_to_the_cap_exactly() {
        let principal = dec!(777.77);
        let projection = project(principal, dec!(0.05), 1000, dec!(1.1));
        assert!(projection.reached_max);
        assert_eq!(projection.total_rewards, principal * dec!(0.1));
    }
}
