use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use stakesight_kpi::interval_stats;
use stakesight_types::{Deposit, UserStakingProfile};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    Hash,
    Eq,
    PartialEq,
    Display,
    AsRefStr,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// One risk dimension: 0-100, higher is riskier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub score: u32,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub concentration: RiskComponent,
    pub liquidity: RiskComponent,
    pub timing: RiskComponent,
    pub overall_score: u32,
    pub level: RiskLevel,
}

const fn level_for(score: u32) -> RiskLevel {
    if score >= 70 {
        RiskLevel::High
    } else if score >= 40 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Herfindahl index of the deposit amounts scaled to 0-100. An empty ledger
/// scores 100: no diversification is possible.
pub fn concentration_risk(deposits: &[Deposit]) -> RiskComponent {
    let total: Decimal = deposits.iter().map(|d| d.amount).sum();
    if deposits.is_empty() || total <= Decimal::ZERO {
        return RiskComponent {
            score: 100,
            level: RiskLevel::High,
        };
    }

    let hhi: Decimal = deposits
        .iter()
        .map(|d| {
            let share = d.amount / total;
            share * share
        })
        .sum();
    let score = (hhi * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .unwrap_or(100)
        .min(100);

    let level = if score >= 80 {
        RiskLevel::High
    } else if score >= 50 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    RiskComponent { score, level }
}

/// Withdrawal pressure against lifetime value, offset when a large unclaimed
/// reward balance provides liquidity headroom.
pub fn liquidity_risk(profile: &UserStakingProfile) -> RiskComponent {
    let lifetime = profile.lifetime_value();
    let withdrawn_ratio = if lifetime > Decimal::ZERO {
        profile.total_withdrawn / lifetime
    } else {
        Decimal::ZERO
    };

    let mut score: u32 = if withdrawn_ratio >= Decimal::new(5, 1) {
        80
    } else if withdrawn_ratio >= Decimal::new(3, 1) {
        60
    } else if withdrawn_ratio >= Decimal::new(1, 1) {
        30
    } else {
        0
    };

    if profile.total_staked > Decimal::ZERO
        && profile.pending_rewards / profile.total_staked > Decimal::new(1, 1)
    {
        score = score.saturating_sub(10);
    }

    RiskComponent {
        score,
        level: level_for(score),
    }
}

/// Coefficient of variation of the inter-deposit gaps. Fewer than two
/// deposits is insufficient data, not zero risk: fixed 50.
pub fn timing_risk(deposits: &[Deposit]) -> RiskComponent {
    let score = interval_stats(deposits).map_or(50, |stats| {
        (stats.coefficient_of_variation * Decimal::from(50))
            .round()
            .to_u32()
            .unwrap_or(100)
            .min(100)
    });
    RiskComponent {
        score,
        level: level_for(score),
    }
}

pub fn assess_risk(profile: &UserStakingProfile) -> RiskReport {
    let concentration = concentration_risk(&profile.deposits);
    let liquidity = liquidity_risk(profile);
    let timing = timing_risk(&profile.deposits);

    let overall = Decimal::from(concentration.score) * Decimal::new(4, 1)
        + Decimal::from(liquidity.score) * Decimal::new(4, 1)
        + Decimal::from(timing.score) * Decimal::new(2, 1);
    let overall_score = overall.round().to_u32().unwrap_or(100).min(100);

    RiskReport {
        concentration,
        liquidity,
        timing,
        overall_score,
        level: level_for(overall_score),
    }
}
