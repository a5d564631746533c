use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stakesight_kpi::{ApyReport, analyze_apy};
use stakesight_types::{StakingConstants, UserStakingProfile};

use crate::error::AnalysisError;
use crate::prediction::{Prediction, predict};
use crate::recommendation::{Recommendation, recommendations};
use crate::risk::{RiskReport, assess_risk};
use crate::scoring::{ExpandedScore, compute_score};

/// Everything the dashboard renders for one user, produced in a single pass.
/// Disposable: recompute rather than mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub expanded_score: ExpandedScore,
    pub apy: ApyReport,
    pub risk: RiskReport,
    pub predictions: Prediction,
    pub recommendations: Vec<Recommendation>,
    pub performance_summary: String,
    /// Flattened, pre-formatted display values, keyed stably for rendering.
    pub metrics: BTreeMap<String, String>,
    /// The profile's observation time; analyses with the same inputs and the
    /// same observation time are identical.
    pub timestamp: DateTime<Utc>,
}

/// Run the full analysis pipeline over one profile snapshot.
///
/// Pure and synchronous; safe to call concurrently for different users with
/// a shared `StakingConstants`.
pub fn analyze(
    profile: &UserStakingProfile,
    constants: &StakingConstants,
) -> Result<AnalysisResult, AnalysisError> {
    constants.validate()?;

    let apy = analyze_apy(profile, constants)?;
    let risk = assess_risk(profile);
    let expanded_score = compute_score(profile, constants, &apy);
    let predictions = predict(profile, constants, &apy);
    let recommendations = recommendations(profile, &apy, &expanded_score, &risk, &predictions);
    let performance_summary = performance_summary(profile, &apy, &expanded_score);
    let metrics = display_metrics(profile, &apy, &risk, &expanded_score);

    Ok(AnalysisResult {
        score: expanded_score.total_score,
        expanded_score,
        apy,
        risk,
        predictions,
        recommendations,
        performance_summary,
        metrics,
        timestamp: profile.now,
    })
}

fn performance_summary(
    profile: &UserStakingProfile,
    apy: &ApyReport,
    score: &ExpandedScore,
) -> String {
    if profile.is_empty() {
        return "No staking activity yet".to_string();
    }

    let tier = match score.total_score {
        80.. => "excellent",
        60..=79 => "solid",
        40..=59 => "developing",
        _ => "needs attention",
    };
    format!(
        "Portfolio score {}/100 ({tier}): {} staked across {} deposit(s) for {} day(s), \
         effective APY {}%",
        score.total_score,
        profile.total_staked.normalize(),
        profile.deposit_count(),
        apy.staking_days,
        apy.effective_apy.round_dp(2).normalize()
    )
}

fn display_metrics(
    profile: &UserStakingProfile,
    apy: &ApyReport,
    risk: &RiskReport,
    score: &ExpandedScore,
) -> BTreeMap<String, String> {
    fn pct(value: Decimal) -> String {
        value.round_dp(2).normalize().to_string()
    }

    let mut metrics = BTreeMap::new();
    metrics.insert("base_apy_pct".to_string(), pct(apy.base_apy));
    metrics.insert("effective_apy_pct".to_string(), pct(apy.effective_apy));
    metrics.insert("actual_apy_pct".to_string(), pct(apy.actual_apy));
    metrics.insert("projected_apy_pct".to_string(), pct(apy.projected_apy));
    metrics.insert(
        "total_staked".to_string(),
        profile.total_staked.normalize().to_string(),
    );
    metrics.insert(
        "total_withdrawn".to_string(),
        profile.total_withdrawn.normalize().to_string(),
    );
    metrics.insert(
        "rewards_claimed".to_string(),
        profile.rewards_claimed.normalize().to_string(),
    );
    metrics.insert(
        "pending_rewards".to_string(),
        profile.pending_rewards.normalize().to_string(),
    );
    metrics.insert("staking_days".to_string(), apy.staking_days.to_string());
    metrics.insert(
        "deposit_count".to_string(),
        profile.deposit_count().to_string(),
    );
    metrics.insert("hold_ratio".to_string(), pct(apy.hold_ratio));
    metrics.insert("score".to_string(), score.total_score.to_string());
    metrics.insert("risk_score".to_string(), risk.overall_score.to_string());
    metrics.insert("risk_level".to_string(), risk.level.to_string());
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal::dec;
    use stakesight_types::Deposit;

    const DAY: i64 = 86_400;

    fn ts(day: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(day * DAY, 0).expect("valid timestamp")
    }

    fn empty_profile() -> UserStakingProfile {
        UserStakingProfile::from_ledger(
            vec![],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(100),
        )
    }

    #[test]
    fn end_to_end_single_deposit_scenario() {
        let profile = UserStakingProfile::from_ledger(
            vec![Deposit::new(dec!(1000), ts(0))],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            ts(91),
        );
        let result = analyze(&profile, &StakingConstants::default()).unwrap();

        assert_eq!(result.apy.multipliers.time_bonus, dec!(1.01));
        assert_eq!(result.apy.multipliers.volume_bonus, dec!(1.005));
        assert_eq!(result.apy.base_apy, dec!(8.76));
        assert_eq!(result.apy.effective_apy.round_dp(2), dec!(8.89));
        assert_eq!(result.score, result.expanded_score.total_score);
        assert_eq!(result.timestamp, ts(91));
        assert_eq!(result.metrics["effective_apy_pct"], "8.89");
        assert_eq!(result.metrics["staking_days"], "91");
    }

    #[test]
    fn empty_profile_reports_no_activity() {
        let result = analyze(&empty_profile(), &StakingConstants::default()).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.performance_summary, "No staking activity yet");
        assert_eq!(result.recommendations.len(), 1);
        assert!(
            result.recommendations[0]
                .message
                .contains("make your first deposit")
        );
    }

    #[test]
    fn analysis_is_idempotent_for_identical_inputs() {
        let profile = UserStakingProfile::from_ledger(
            vec![
                Deposit::new(dec!(1500), ts(0)),
                Deposit::new(dec!(800), ts(45)),
                Deposit::new(dec!(2200), ts(90)),
            ],
            dec!(300),
            dec!(120),
            dec!(40),
            ts(200),
        );
        let constants = StakingConstants::default();

        let first = analyze(&profile, &constants).unwrap();
        let second = analyze(&profile, &constants).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn invalid_constants_fail_the_analysis() {
        let constants = StakingConstants {
            hourly_roi: Decimal::ZERO,
            ..Default::default()
        };
        assert!(analyze(&empty_profile(), &constants).is_err());
    }

    #[test]
    fn result_serializes_with_stable_field_names() {
        let result = analyze(&empty_profile(), &StakingConstants::default()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();

        for field in [
            "score",
            "expanded_score",
            "apy",
            "risk",
            "predictions",
            "recommendations",
            "performance_summary",
            "metrics",
            "timestamp",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["risk"]["concentration"]["level"], "high");
        assert_eq!(
            json["predictions"]["timing"]["pattern"],
            "insufficient_data"
        );
    }
}
