pub mod apy;
pub mod base_apy;
pub mod cadence;
pub mod compound;
pub mod error;
pub mod multipliers;

pub use apy::{ApyReport, analyze_apy};
pub use base_apy::{BaseApy, base_apy};
pub use cadence::{ConsistencyReport, DepositFrequency, IntervalStats, consistency, interval_stats};
pub use compound::{CompoundProjection, days_to_cap, project};
pub use error::KpiError;
pub use multipliers::{
    MultiplierSet, calculate_multipliers, efficiency_multiplier, time_bonus, volume_bonus,
    withdrawal_penalty,
};
