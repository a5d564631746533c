use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use stakesight_kpi::{ApyReport, ConsistencyReport, consistency};
use stakesight_types::{Deposit, StakingConstants, UserStakingProfile};

const SECONDS_PER_WEEK: i64 = 7 * 86_400;

/// The eight category scores. Maxima are fixed weights
/// (15/15/15/10/15/10/10/10) summing to 100; the total is their sum, so a
/// single strong metric cannot carry the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    /// Effective APY against the base rate. Max 15.
    pub apy_performance: u32,
    /// Absolute stake size. Max 15.
    pub stake_size: u32,
    /// Staking age. Max 15.
    pub time_commitment: u32,
    /// Deposit-slot utilization. Max 10.
    pub strategy_efficiency: u32,
    /// Deposit-cadence regularity. Max 15.
    pub consistency: u32,
    /// Hold ratio. Max 10.
    pub risk_management: u32,
    /// Annualized earned-reward rate. Max 10.
    pub capital_efficiency: u32,
    /// Spread of deposits across weekly cohorts. Max 10.
    pub temporal_diversification: u32,
}

impl CategoryScores {
    pub const fn total(&self) -> u32 {
        self.apy_performance
            + self.stake_size
            + self.time_commitment
            + self.strategy_efficiency
            + self.consistency
            + self.risk_management
            + self.capital_efficiency
            + self.temporal_diversification
    }
}

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
pub enum EfficiencyRating {
    Excellent,
    Good,
    Fair,
    #[default]
    Poor,
}

/// How hard the staked capital works: earned rewards per staked unit per day,
/// annualized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalEfficiency {
    pub daily_roi: Decimal,
    pub annualized_pct: Decimal,
    pub rating: EfficiencyRating,
}

pub fn capital_efficiency(profile: &UserStakingProfile) -> CapitalEfficiency {
    let staking_days = profile.staking_days();
    if staking_days == 0 || profile.total_staked <= Decimal::ZERO {
        return CapitalEfficiency {
            daily_roi: Decimal::ZERO,
            annualized_pct: Decimal::ZERO,
            rating: EfficiencyRating::Poor,
        };
    }

    let daily_roi =
        (profile.total_rewards() / profile.total_staked) / Decimal::from(staking_days);
    let annualized_pct = daily_roi * Decimal::from(365) * Decimal::from(100);
    let rating = if annualized_pct >= Decimal::from(8) {
        EfficiencyRating::Excellent
    } else if annualized_pct >= Decimal::from(6) {
        EfficiencyRating::Good
    } else if annualized_pct >= Decimal::from(4) {
        EfficiencyRating::Fair
    } else {
        EfficiencyRating::Poor
    };

    CapitalEfficiency {
        daily_roi,
        annualized_pct,
        rating,
    }
}

/// Inverted Herfindahl index over weekly deposit cohorts, scaled to 0-100.
/// Concentrating everything into one week scores 0 naturally.
pub fn temporal_diversification(deposits: &[Deposit]) -> u32 {
    let total: Decimal = deposits.iter().map(|d| d.amount).sum();
    if deposits.is_empty() || total <= Decimal::ZERO {
        return 0;
    }

    let mut cohorts: BTreeMap<i64, Decimal> = BTreeMap::new();
    for deposit in deposits {
        let week = deposit.timestamp.timestamp().div_euclid(SECONDS_PER_WEEK);
        *cohorts.entry(week).or_insert(Decimal::ZERO) += deposit.amount;
    }

    let hhi: Decimal = cohorts
        .values()
        .map(|cohort_total| {
            let share = *cohort_total / total;
            share * share
        })
        .sum();

    ((Decimal::ONE - hhi) * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .unwrap_or(0)
        .min(100)
}

/// Sub-metrics the category buckets are derived from, reported alongside the
/// scores for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub consistency: ConsistencyReport,
    pub capital_efficiency: CapitalEfficiency,
    pub temporal_diversification: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedScore {
    pub total_score: u32,
    pub categories: CategoryScores,
    pub breakdown: ScoreBreakdown,
}

pub fn compute_score(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
    apy: &ApyReport,
) -> ExpandedScore {
    let consistency_report = consistency(&profile.deposits);
    let capital = capital_efficiency(profile);
    let diversification = temporal_diversification(&profile.deposits);

    let categories = CategoryScores {
        apy_performance: apy_performance_score(profile, apy),
        stake_size: stake_size_score(profile.total_staked),
        time_commitment: time_commitment_score(profile.staking_days()),
        strategy_efficiency: strategy_efficiency_score(profile, constants),
        consistency: consistency_score(&consistency_report),
        risk_management: risk_management_score(profile),
        capital_efficiency: capital_efficiency_score(profile, &capital),
        temporal_diversification: diversification_score(diversification),
    };

    ExpandedScore {
        total_score: categories.total(),
        categories,
        breakdown: ScoreBreakdown {
            consistency: consistency_report,
            capital_efficiency: capital,
            temporal_diversification: diversification,
        },
    }
}

fn apy_performance_score(profile: &UserStakingProfile, apy: &ApyReport) -> u32 {
    if profile.total_staked <= Decimal::ZERO || apy.base_apy <= Decimal::ZERO {
        return 0;
    }
    let ratio = apy.effective_apy / apy.base_apy;
    if ratio >= Decimal::new(105, 2) {
        15
    } else if ratio >= Decimal::new(102, 2) {
        12
    } else if ratio >= Decimal::new(1005, 3) {
        8
    } else if ratio > Decimal::ONE {
        4
    } else {
        0
    }
}

fn stake_size_score(total_staked: Decimal) -> u32 {
    if total_staked >= Decimal::from(10_000) {
        15
    } else if total_staked >= Decimal::from(5_000) {
        12
    } else if total_staked >= Decimal::from(1_000) {
        8
    } else if total_staked > Decimal::ZERO {
        4
    } else {
        0
    }
}

const fn time_commitment_score(staking_days: u64) -> u32 {
    match staking_days {
        365.. => 15,
        180..=364 => 12,
        90..=179 => 8,
        30..=89 => 4,
        1..=29 => 2,
        0 => 0,
    }
}

fn strategy_efficiency_score(profile: &UserStakingProfile, constants: &StakingConstants) -> u32 {
    if profile.deposit_count() == 0 {
        return 0;
    }
    if constants.max_deposits_per_user == 0 {
        return 4;
    }
    let utilization = Decimal::from(profile.deposit_count() as u64)
        / Decimal::from(constants.max_deposits_per_user);
    if utilization <= Decimal::new(6, 1) {
        10
    } else if utilization <= Decimal::new(8, 1) {
        7
    } else {
        4
    }
}

fn consistency_score(report: &ConsistencyReport) -> u32 {
    if report.score >= Decimal::from(80) {
        15
    } else if report.score >= Decimal::from(60) {
        11
    } else if report.score >= Decimal::from(40) {
        7
    } else if report.score >= Decimal::from(20) {
        3
    } else {
        0
    }
}

fn risk_management_score(profile: &UserStakingProfile) -> u32 {
    if profile.total_staked <= Decimal::ZERO {
        return 0;
    }
    let hold_ratio = profile.hold_ratio();
    if hold_ratio >= Decimal::new(95, 2) {
        10
    } else if hold_ratio >= Decimal::new(8, 1) {
        7
    } else if hold_ratio >= Decimal::new(5, 1) {
        4
    } else {
        1
    }
}

fn capital_efficiency_score(profile: &UserStakingProfile, capital: &CapitalEfficiency) -> u32 {
    if profile.total_staked <= Decimal::ZERO || profile.staking_days() == 0 {
        return 0;
    }
    match capital.rating {
        EfficiencyRating::Excellent => 10,
        EfficiencyRating::Good => 7,
        EfficiencyRating::Fair => 4,
        EfficiencyRating::Poor => 1,
    }
}

const fn diversification_score(index: u32) -> u32 {
    match index {
        75.. => 10,
        50..=74 => 7,
        25..=49 => 4,
        1..=24 => 2,
        0 => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal::dec;
    use stakesight_kpi::analyze_apy;

    const DAY: i64 = 86_400;

    fn ts(day: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(day * DAY, 0).expect("valid timestamp")
    }

    fn deposit(amount: Decimal, day: i64) -> Deposit {
        Deposit::new(amount, ts(day))
    }

    fn score_for(profile: &UserStakingProfile) -> ExpandedScore {
        let constants = StakingConstants::default();
        let apy = analyze_apy(profile, &constants).unwrap();
        compute_score(profile, &constants, &apy)
    }

    #[test]
    fn empty_profile_scores_zero() {
        let profile = UserStakingProfile::from_ledger(
            vec![],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(100),
        );
        let score = score_for(&profile);
        assert_eq!(score.total_score, 0);
        assert_eq!(score.categories.total(), 0);
    }

    #[test]
    fn categories_always_sum_to_total() {
        let profiles = [
            UserStakingProfile::from_ledger(
                vec![deposit(dec!(1000), 0)],
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                ts(91),
            ),
            UserStakingProfile::from_ledger(
                (0..12).map(|i| deposit(dec!(1000), i * 30)).collect(),
                dec!(500),
                dec!(200),
                dec!(50),
                ts(400),
            ),
        ];
        for profile in profiles {
            let score = score_for(&profile);
            assert_eq!(score.total_score, score.categories.total());
            assert!(score.total_score <= 100);
        }
    }

    #[test]
    fn veteran_regular_staker_scores_high() {
        // Twelve monthly deposits of 1000 held for over a year, no
        // withdrawals, healthy claimed rewards.
        let profile = UserStakingProfile::from_ledger(
            (0..12).map(|i| deposit(dec!(1000), i * 30)).collect(),
            Decimal::ZERO,
            dec!(800),
            dec!(100),
            ts(365),
        );
        let score = score_for(&profile);
        assert_eq!(score.categories.stake_size, 15);
        assert_eq!(score.categories.time_commitment, 15);
        assert_eq!(score.categories.consistency, 15);
        assert_eq!(score.categories.risk_management, 10);
        assert_eq!(score.categories.temporal_diversification, 10);
        assert!(score.total_score >= 80);
    }

    #[test]
    fn capital_efficiency_rates_annualized_earned_yield() {
        // 1000 staked for 365 days earning 85 total: 8.5% annualized.
        let mut profile = UserStakingProfile::from_ledger(
            vec![deposit(dec!(1000), 0)],
            Decimal::ZERO,
            dec!(85),
            Decimal::ZERO,
            ts(365),
        );
        assert_eq!(
            capital_efficiency(&profile).rating,
            EfficiencyRating::Excellent
        );

        profile.rewards_claimed = dec!(50);
        assert_eq!(capital_efficiency(&profile).rating, EfficiencyRating::Fair);

        profile.rewards_claimed = Decimal::ZERO;
        assert_eq!(capital_efficiency(&profile).rating, EfficiencyRating::Poor);
    }

    #[test]
    fn temporal_diversification_rewards_spread_cohorts() {
        // All value in one week.
        assert_eq!(
            temporal_diversification(&[deposit(dec!(500), 0), deposit(dec!(500), 1)]),
            0
        );
        // Ten equal weekly cohorts: HHI 0.1.
        let spread: Vec<_> = (0..10).map(|i| deposit(dec!(100), i * 7)).collect();
        assert_eq!(temporal_diversification(&spread), 90);
        assert_eq!(temporal_diversification(&[]), 0);
    }

    #[test]
    fn single_fresh_deposit_lands_in_the_low_band() {
        let profile = UserStakingProfile::from_ledger(
            vec![deposit(dec!(100), 0)],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(5),
        );
        let score = score_for(&profile);
        assert!(score.total_score < 60, "got {}", score.total_score);
        assert_eq!(score.categories.consistency, 0);
        assert_eq!(score.categories.temporal_diversification, 0);
    }
}
