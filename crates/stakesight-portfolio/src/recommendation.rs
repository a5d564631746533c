use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use rust_decimal::Decimal;
use stakesight_kpi::ApyReport;
use stakesight_types::UserStakingProfile;

use crate::prediction::Prediction;
use crate::risk::{RiskLevel, RiskReport};
use crate::scoring::{EfficiencyRating, ExpandedScore};

/// Variant order encodes rank: earlier sorts first in the advisory list.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Display,
    AsRefStr,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum RecommendationCategory {
    Stake,
    Timing,
    Risk,
    Efficiency,
    Consistency,
    Rewards,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Stable machine-readable identifier for the rule that fired.
    pub kind: String,
    pub priority: Priority,
    pub message: String,
    pub category: RecommendationCategory,
    pub impact: String,
}

impl Recommendation {
    fn new(
        kind: &str,
        priority: Priority,
        category: RecommendationCategory,
        message: String,
        impact: &str,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            priority,
            message,
            category,
            impact: impact.to_string(),
        }
    }
}

/// Rule table over every engine's output. Rules fire independently; the
/// result is ordered by priority, critical first. Regenerated on every
/// analysis, nothing is carried over.
pub fn recommendations(
    profile: &UserStakingProfile,
    apy: &ApyReport,
    score: &ExpandedScore,
    risk: &RiskReport,
    predictions: &Prediction,
) -> Vec<Recommendation> {
    if profile.is_empty() {
        return vec![Recommendation::new(
            "first_deposit",
            Priority::High,
            RecommendationCategory::Stake,
            "No staking activity yet: make your first deposit to start earning".to_string(),
            "Begins reward accrual and unlocks portfolio analytics",
        )];
    }

    let mut recs = Vec::new();

    if score.total_score < 30 {
        if score.categories.stake_size <= 4 {
            recs.push(Recommendation::new(
                "increase_stake",
                Priority::Critical,
                RecommendationCategory::Stake,
                format!(
                    "Your stake of {} is below the first volume-bonus tier; increasing it \
                     raises both yield and score",
                    profile.total_staked.normalize()
                ),
                "Unlocks volume bonuses of up to +2% APY",
            ));
        }
        if score.categories.time_commitment <= 4 {
            recs.push(Recommendation::new(
                "extend_commitment",
                Priority::Critical,
                RecommendationCategory::Timing,
                format!(
                    "Only {} staking day(s) accrued; time bonuses start at 90 days",
                    apy.staking_days
                ),
                "Time bonuses add up to +5% APY",
            ));
        }
        if score.categories.strategy_efficiency <= 4 {
            recs.push(Recommendation::new(
                "consolidate_deposits",
                Priority::Critical,
                RecommendationCategory::Efficiency,
                format!(
                    "{} deposits are crowding your slot allowance; consolidate to restore \
                     the efficiency multiplier",
                    profile.deposit_count()
                ),
                "Removes the fragmentation penalty of up to -5% APY",
            ));
        }
    }

    let any_high = [risk.concentration, risk.liquidity, risk.timing]
        .iter()
        .any(|component| component.level == RiskLevel::High);
    if risk.overall_score >= 60 || any_high {
        if risk.concentration.level == RiskLevel::High {
            recs.push(Recommendation::new(
                "diversify_deposits",
                Priority::High,
                RecommendationCategory::Risk,
                "Your position is concentrated in very few deposits; spreading value over \
                 several deposits lowers concentration risk"
                    .to_string(),
                "Lowers the concentration component of the risk score",
            ));
        }
        if risk.liquidity.level == RiskLevel::High {
            recs.push(Recommendation::new(
                "slow_withdrawals",
                Priority::High,
                RecommendationCategory::Risk,
                "Withdrawals make up a large share of your lifetime value; letting the \
                 position rebuild reduces liquidity risk"
                    .to_string(),
                "Lowers liquidity risk and lifts the withdrawal penalty",
            ));
        }
        if risk.timing.level == RiskLevel::High {
            recs.push(Recommendation::new(
                "steady_cadence",
                Priority::High,
                RecommendationCategory::Risk,
                "Deposit timing is highly erratic; a predictable schedule reduces timing \
                 risk"
                    .to_string(),
                "Lowers the timing component of the risk score",
            ));
        }
    }

    if score.breakdown.consistency.score < Decimal::from(40)
        && profile.deposit_count() >= 2
    {
        recs.push(Recommendation::new(
            "improve_consistency",
            Priority::Medium,
            RecommendationCategory::Consistency,
            predictions.timing.recommendation.clone(),
            "Raises the consistency score toward its 15-point maximum",
        ));
    }

    match score.breakdown.capital_efficiency.rating {
        EfficiencyRating::Poor | EfficiencyRating::Fair => {
            recs.push(Recommendation::new(
                "boost_capital_efficiency",
                Priority::Medium,
                RecommendationCategory::Rewards,
                format!(
                    "Capital efficiency is rated {}; claiming and restaking rewards keeps \
                     capital compounding",
                    score.breakdown.capital_efficiency.rating
                ),
                "Improves the annualized earned-reward rate",
            ));
        }
        EfficiencyRating::Excellent | EfficiencyRating::Good => {}
    }

    recs.push(Recommendation::new(
        "optimal_stake_size",
        Priority::Low,
        RecommendationCategory::Stake,
        format!(
            "Suggested next deposit: {} ({})",
            predictions.optimal_stake.recommended,
            predictions.optimal_stake.reasoning
        ),
        "Positions the portfolio for the next volume-bonus tier",
    ));

    recs.push(Recommendation::new(
        "next_deposit_window",
        Priority::Low,
        RecommendationCategory::Timing,
        format!(
            "Next deposit window: {}",
            predictions.timing.next_optimal.format("%Y-%m-%d")
        ),
        "Keeps the deposit cadence on rhythm",
    ));

    if let Some(year) = predictions.future_rewards.get(&365) {
        recs.push(Recommendation::new(
            "yearly_outlook",
            Priority::Info,
            RecommendationCategory::Rewards,
            format!(
                "At the current effective APY of {}%, a year of staking projects {} in \
                 rewards",
                year.apy.round_dp(2).normalize(),
                year.rewards.round_dp(2).normalize()
            ),
            "Reference figure for planning",
        ));
    }

    if score.total_score >= 80 {
        recs.push(Recommendation::new(
            "elite_portfolio",
            Priority::Info,
            RecommendationCategory::Milestone,
            format!(
                "Portfolio score {}: among the strongest staking profiles",
                score.total_score
            ),
            "Milestone",
        ));
    } else if score.total_score >= 70 {
        recs.push(Recommendation::new(
            "strong_portfolio",
            Priority::Info,
            RecommendationCategory::Milestone,
            format!(
                "Portfolio score {}: a strong profile, within reach of the top bracket",
                score.total_score
            ),
            "Milestone",
        ));
    }

    recs.sort_by_key(|rec| rec.priority);
    recs
}
