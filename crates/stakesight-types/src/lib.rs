pub mod amount;
pub mod constants;
pub mod profile;

pub use amount::Amount;
pub use constants::{ConstantsError, StakingConstants, TimeBonusTier};
pub use profile::{Deposit, UserStakingProfile};
