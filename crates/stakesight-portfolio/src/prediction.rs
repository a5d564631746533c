use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use stakesight_kpi::{ApyReport, DepositFrequency, consistency};
use stakesight_types::{StakingConstants, UserStakingProfile};

/// Projection horizons offered to the dashboard, in days.
pub const PROJECTION_HORIZONS: [u64; 4] = [30, 90, 180, 365];

const DEFAULT_RECOMMENDED_STAKE: u64 = 1_000;
const MIN_RECOMMENDED_STAKE: u64 = 500;
const DEFAULT_CADENCE_DAYS: i64 = 30;

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
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum TimingPattern {
    #[default]
    InsufficientData,
    Weekly,
    Monthly,
    Quarterly,
    Irregular,
}

impl From<DepositFrequency> for TimingPattern {
    fn from(frequency: DepositFrequency) -> Self {
        match frequency {
            DepositFrequency::Weekly => Self::Weekly,
            DepositFrequency::Monthly => Self::Monthly,
            DepositFrequency::Quarterly => Self::Quarterly,
            DepositFrequency::Irregular => Self::Irregular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeSizeAdvice {
    pub recommended: Decimal,
    pub reasoning: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAdvice {
    pub pattern: TimingPattern,
    pub recommendation: String,
    pub next_optimal: DateTime<Utc>,
    pub confidence: Confidence,
}

/// Simple-interest projection for one horizon. Linear by intent: this is the
/// steady-state run-rate view, not the capped compounding curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardProjection {
    pub rewards: Decimal,
    /// Rewards after the protocol commission.
    pub rewards_net: Decimal,
    /// Position value at the horizon, gross of commission.
    pub total: Decimal,
    /// The APY the projection assumed, in percent.
    pub apy: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub optimal_stake: StakeSizeAdvice,
    pub timing: TimingAdvice,
    /// Keyed by horizon length in days.
    pub future_rewards: BTreeMap<u64, RewardProjection>,
}

pub fn predict(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
    apy: &ApyReport,
) -> Prediction {
    Prediction {
        optimal_stake: optimal_stake(profile),
        timing: optimal_timing(profile),
        future_rewards: future_rewards(profile, constants, apy),
    }
}

fn optimal_stake(profile: &UserStakingProfile) -> StakeSizeAdvice {
    if profile.deposit_count() == 0 {
        return StakeSizeAdvice {
            recommended: Decimal::from(DEFAULT_RECOMMENDED_STAKE),
            reasoning: "No deposit history; the volume-bonus entry tier of 1000 is a solid \
                        opening position"
                .to_string(),
            confidence: Confidence::Medium,
        };
    }

    let average = profile.average_deposit();
    let mut recommended =
        (average * Decimal::new(12, 1)).max(Decimal::from(MIN_RECOMMENDED_STAKE));
    let mut reasoning = format!(
        "20% above your average deposit of {}",
        average.round_dp(2).normalize()
    );

    // When the gap to the next volume tier is the bigger ask, that is the
    // actionable number.
    let next_breakpoint = [Decimal::from(1_000), Decimal::from(5_000)]
        .into_iter()
        .find(|bp| profile.total_staked < *bp);
    if let Some(breakpoint) = next_breakpoint {
        let gap = breakpoint - profile.total_staked;
        if gap > recommended {
            recommended = gap;
            reasoning = format!(
                "staking {} more lifts your {} total into the {} volume-bonus tier",
                gap.normalize(),
                profile.total_staked.normalize(),
                breakpoint
            );
        }
    }

    StakeSizeAdvice {
        recommended: recommended.round_dp(2).normalize(),
        reasoning,
        confidence: Confidence::High,
    }
}

fn optimal_timing(profile: &UserStakingProfile) -> TimingAdvice {
    if profile.deposit_count() < 3 {
        return TimingAdvice {
            pattern: TimingPattern::InsufficientData,
            recommendation: "Not enough deposit history to detect a cadence; a 30-day \
                             schedule is a sound default"
                .to_string(),
            next_optimal: profile.now + Duration::days(DEFAULT_CADENCE_DAYS),
            confidence: Confidence::Low,
        };
    }

    let report = consistency(&profile.deposits);
    let mean_days = report
        .mean_interval_days
        .round()
        .to_i64()
        .unwrap_or(DEFAULT_CADENCE_DAYS)
        .max(1);

    let recommendation = if report.score < Decimal::from(40) {
        format!(
            "Deposit spacing is irregular; keeping to a steady ~{mean_days}-day rhythm \
             improves the consistency profile"
        )
    } else {
        format!("Current ~{mean_days}-day cadence is working; keep it up")
    };

    TimingAdvice {
        pattern: report.frequency.into(),
        recommendation,
        next_optimal: profile.now + Duration::days(mean_days),
        confidence: Confidence::High,
    }
}

fn future_rewards(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
    apy: &ApyReport,
) -> BTreeMap<u64, RewardProjection> {
    let daily_fraction = apy.effective_apy / Decimal::from(365) / Decimal::from(100);
    let commission_keep = Decimal::ONE - constants.commission_rate;

    PROJECTION_HORIZONS
        .into_iter()
        .map(|days| {
            let rewards = profile.total_staked * daily_fraction * Decimal::from(days);
            let projection = RewardProjection {
                rewards,
                rewards_net: rewards * commission_keep,
                total: profile.total_staked + rewards,
                apy: apy.effective_apy,
            };
            (days, projection)
        })
        .collect()
}
