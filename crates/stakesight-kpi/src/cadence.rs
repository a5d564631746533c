use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use stakesight_types::Deposit;

const SECONDS_PER_DAY: i64 = 86_400;

/// Inter-deposit gap statistics, the shared input for timing risk,
/// consistency scoring and cadence prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub mean_days: Decimal,
    pub stddev_days: Decimal,
    pub coefficient_of_variation: Decimal,
    /// Number of gaps the statistics are computed over.
    pub samples: usize,
}

/// Gap statistics over the ledger ordered by timestamp. Needs at least two
/// deposits; `None` otherwise.
pub fn interval_stats(deposits: &[Deposit]) -> Option<IntervalStats> {
    if deposits.len() < 2 {
        return None;
    }

    let mut timestamps: Vec<_> = deposits.iter().map(|d| d.timestamp).collect();
    timestamps.sort_unstable();

    let gaps: Vec<Decimal> = timestamps
        .windows(2)
        .map(|w| {
            let seconds = (w[1] - w[0]).num_seconds().max(0);
            Decimal::from(seconds) / Decimal::from(SECONDS_PER_DAY)
        })
        .collect();

    let count = Decimal::from(gaps.len() as u64);
    let mean: Decimal = gaps.iter().sum::<Decimal>() / count;
    let variance: Decimal = gaps
        .iter()
        .map(|gap| {
            let delta = *gap - mean;
            delta * delta
        })
        .sum::<Decimal>()
        / count;
    let stddev = variance.sqrt().unwrap_or(Decimal::ZERO);
    let coefficient_of_variation = if mean > Decimal::ZERO {
        stddev / mean
    } else {
        Decimal::ZERO
    };

    Some(IntervalStats {
        mean_days: mean,
        stddev_days: stddev,
        coefficient_of_variation,
        samples: gaps.len(),
    })
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
pub enum DepositFrequency {
    Weekly,
    Monthly,
    Quarterly,
    #[default]
    Irregular,
}

impl DepositFrequency {
    /// Label for a mean inter-deposit gap.
    pub fn from_mean_interval(mean_days: Decimal) -> Self {
        if mean_days <= Decimal::from(7) {
            Self::Weekly
        } else if mean_days <= Decimal::from(30) {
            Self::Monthly
        } else if mean_days <= Decimal::from(90) {
            Self::Quarterly
        } else {
            Self::Irregular
        }
    }
}

/// How regular the user's deposit rhythm is: 100 for a metronome, falling
/// with the coefficient of variation of the gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub score: Decimal,
    pub frequency: DepositFrequency,
    pub mean_interval_days: Decimal,
    pub coefficient_of_variation: Decimal,
}

pub fn consistency(deposits: &[Deposit]) -> ConsistencyReport {
    interval_stats(deposits).map_or(
        ConsistencyReport {
            score: Decimal::ZERO,
            frequency: DepositFrequency::Irregular,
            mean_interval_days: Decimal::ZERO,
            coefficient_of_variation: Decimal::ZERO,
        },
        |stats| {
            let score = (Decimal::ONE_HUNDRED
                - stats.coefficient_of_variation * Decimal::from(50))
            .max(Decimal::ZERO);
            ConsistencyReport {
                score,
                frequency: DepositFrequency::from_mean_interval(stats.mean_days),
                mean_interval_days: stats.mean_days,
                coefficient_of_variation: stats.coefficient_of_variation,
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal::dec;

    fn deposit(amount: Decimal, day: i64) -> Deposit {
        let ts: DateTime<Utc> =
            DateTime::from_timestamp(day * SECONDS_PER_DAY, 0).expect("valid timestamp");
        Deposit::new(amount, ts)
    }

    #[test]
    fn fewer_than_two_deposits_give_no_stats() {
        assert_eq!(interval_stats(&[]), None);
        assert_eq!(interval_stats(&[deposit(dec!(100), 0)]), None);
    }

    #[test]
    fn monthly_metronome_scores_one_hundred() {
        let deposits: Vec<_> = (0..10).map(|i| deposit(dec!(100), i * 30)).collect();
        let report = consistency(&deposits);
        assert_eq!(report.score, dec!(100));
        assert_eq!(report.frequency, DepositFrequency::Monthly);
        assert_eq!(report.mean_interval_days, dec!(30));
        assert_eq!(report.coefficient_of_variation, dec!(0));
    }

    #[test]
    fn unsorted_input_is_ordered_before_measuring() {
        let deposits = vec![
            deposit(dec!(100), 60),
            deposit(dec!(100), 0),
            deposit(dec!(100), 30),
        ];
        let stats = interval_stats(&deposits).unwrap();
        assert_eq!(stats.mean_days, dec!(30));
        assert_eq!(stats.stddev_days, dec!(0));
    }

    #[test]
    fn erratic_gaps_lower_the_score() {
        let deposits = vec![
            deposit(dec!(100), 0),
            deposit(dec!(100), 2),
            deposit(dec!(100), 90),
            deposit(dec!(100), 95),
        ];
        let report = consistency(&deposits);
        assert!(report.score < dec!(50));
        assert!(report.coefficient_of_variation > dec!(1));
    }

    #[test]
    fn frequency_labels_follow_the_mean_gap() {
        assert_eq!(
            DepositFrequency::from_mean_interval(dec!(7)),
            DepositFrequency::Weekly
        );
        assert_eq!(
            DepositFrequency::from_mean_interval(dec!(30)),
            DepositFrequency::Monthly
        );
        assert_eq!(
            DepositFrequency::from_mean_interval(dec!(90)),
            DepositFrequency::Quarterly
        );
        assert_eq!(
            DepositFrequency::from_mean_interval(dec!(91)),
            DepositFrequency::Irregular
        );
    }
}
