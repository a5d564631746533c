use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stakesight_types::{StakingConstants, UserStakingProfile};

use crate::base_apy::base_apy;
use crate::error::KpiError;
use crate::multipliers::{MultiplierSet, calculate_multipliers};

/// A user's effective yield picture. All APY fields are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApyReport {
    /// Capped nominal rate from constants alone.
    pub base_apy: Decimal,
    /// `base_apy` scaled by the product of the four multipliers.
    pub effective_apy: Decimal,
    /// Realized rate observed on-chain; independent of the model.
    pub actual_apy: Decimal,
    /// Effective rate under the conservative projection ceiling.
    pub projected_apy: Decimal,
    pub multipliers: MultiplierSet,
    pub daily_rate: Decimal,
    pub monthly_rate: Decimal,
    pub hold_ratio: Decimal,
    pub staking_days: u64,
    /// Lifetime claimed rewards as a fraction of the stake.
    pub roi: Decimal,
    /// Textual nudges keyed off whichever multiplier is sub-maximal.
    pub hints: Vec<String>,
}

pub fn analyze_apy(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
) -> Result<ApyReport, KpiError> {
    let base = base_apy(constants)?;
    let multipliers = calculate_multipliers(profile, constants);
    let effective_apy = base.capped_apy * multipliers.product();
    let staking_days = profile.staking_days();

    // Observed rate, deliberately independent of the model: it surfaces drift
    // between theory and what the chain actually paid.
    let actual_apy = if staking_days > 0 && profile.total_staked > Decimal::ZERO {
        (profile.rewards_claimed / profile.total_staked)
            * (Decimal::from(365) / Decimal::from(staking_days))
            * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    // Ceiling of base * 1.1 keeps stacked multipliers from projecting
    // implausible rates.
    let projected_apy = effective_apy.min(base.capped_apy * Decimal::new(11, 1));

    let roi = if profile.total_staked > Decimal::ZERO {
        profile.rewards_claimed / profile.total_staked
    } else {
        Decimal::ZERO
    };

    let hints = apy_hints(profile, constants, staking_days);

    Ok(ApyReport {
        base_apy: base.capped_apy,
        effective_apy,
        actual_apy,
        projected_apy,
        multipliers,
        daily_rate: base.daily_rate,
        monthly_rate: base.daily_rate * Decimal::from(30),
        hold_ratio: profile.hold_ratio(),
        staking_days,
        roi,
        hints,
    })
}

fn apy_hints(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
    staking_days: u64,
) -> Vec<String> {
    let mut hints = Vec::new();

    if let Some(next_tier) = constants
        .time_bonus_tiers
        .iter()
        .find(|tier| tier.days > staking_days)
    {
        let bonus_pct = next_tier.bonus * Decimal::from(100);
        hints.push(format!(
            "{} more staking days unlock a +{}% time bonus",
            next_tier.days - staking_days,
            bonus_pct.normalize()
        ));
    }

    for breakpoint in [Decimal::from(1_000), Decimal::from(5_000), Decimal::from(10_000)] {
        if profile.total_staked < breakpoint {
            hints.push(format!(
                "staking {} more reaches the {} volume tier",
                (breakpoint - profile.total_staked).normalize(),
                breakpoint
            ));
            break;
        }
    }

    if profile.hold_ratio() < Decimal::new(8, 1) {
        hints.push(
            "withdrawals exceed 20% of lifetime value; the withdrawal penalty is active"
                .to_string(),
        );
    }

    if constants.max_deposits_per_user > 0 {
        let utilization = Decimal::from(profile.deposit_count() as u64)
            / Decimal::from(constants.max_deposits_per_user);
        if utilization > Decimal::new(8, 1) {
            hints.push(format!(
                "{} of {} deposit slots used; consolidating deposits restores the efficiency multiplier",
                profile.deposit_count(),
                constants.max_deposits_per_user
            ));
        }
    }

    hints
}
