use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stakesight_types::{StakingConstants, TimeBonusTier, UserStakingProfile};

/// The four independent yield modifiers, each a multiplicative factor with
/// 1.0 neutral. Order of application does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierSet {
    pub time_bonus: Decimal,
    pub volume_bonus: Decimal,
    pub efficiency: Decimal,
    pub withdrawal_penalty: Decimal,
}

impl MultiplierSet {
    pub fn neutral() -> Self {
        Self {
            time_bonus: Decimal::ONE,
            volume_bonus: Decimal::ONE,
            efficiency: Decimal::ONE,
            withdrawal_penalty: Decimal::ONE,
        }
    }

    pub fn product(&self) -> Decimal {
        self.time_bonus * self.volume_bonus * self.efficiency * self.withdrawal_penalty
    }
}

/// Step function over the loyalty schedule: the highest tier whose `days`
/// threshold is met wins, boundary days included.
pub fn time_bonus(staking_days: u64, tiers: &[TimeBonusTier]) -> Decimal {
    let mut factor = Decimal::ONE;
    for tier in tiers {
        if staking_days >= tier.days {
            factor = Decimal::ONE + tier.bonus;
        }
    }
    factor
}

/// Fixed stake-size breakpoints: 1000 -> +0.5%, 5000 -> +1%, 10000 -> +2%.
pub fn volume_bonus(total_staked: Decimal) -> Decimal {
    if total_staked >= Decimal::from(10_000) {
        Decimal::new(102, 2)
    } else if total_staked >= Decimal::from(5_000) {
        Decimal::new(101, 2)
    } else if total_staked >= Decimal::from(1_000) {
        Decimal::new(1005, 3)
    } else {
        Decimal::ONE
    }
}

/// Penalizes over-fragmentation: many small deposits approach the per-user
/// slot ceiling without adding yield.
pub fn efficiency_multiplier(deposit_count: usize, max_deposits_per_user: u32) -> Decimal {
    if max_deposits_per_user == 0 {
        return Decimal::ONE;
    }
    let utilization =
        Decimal::from(deposit_count as u64) / Decimal::from(max_deposits_per_user);
    if utilization > Decimal::new(8, 1) {
        Decimal::new(95, 2)
    } else if utilization > Decimal::new(6, 1) {
        Decimal::new(98, 2)
    } else {
        Decimal::ONE
    }
}

/// Heavy withdrawers (hold ratio below 0.8) lose 5% of the modeled rate.
pub fn withdrawal_penalty(total_staked: Decimal, total_withdrawn: Decimal) -> Decimal {
    let lifetime = total_staked + total_withdrawn;
    if lifetime <= Decimal::ZERO {
        return Decimal::ONE;
    }
    let hold_ratio = total_staked / lifetime;
    if hold_ratio < Decimal::new(8, 1) {
        Decimal::new(95, 2)
    } else {
        Decimal::ONE
    }
}

pub fn calculate_multipliers(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
) -> MultiplierSet {
    MultiplierSet {
        time_bonus: time_bonus(profile.staking_days(), &constants.time_bonus_tiers),
        volume_bonus: volume_bonus(profile.total_staked),
        efficiency: efficiency_multiplier(
            profile.deposit_count(),
            constants.max_deposits_per_user,
        ),
        withdrawal_penalty: withdrawal_penalty(profile.total_staked, profile.total_withdrawn),
    }
}
