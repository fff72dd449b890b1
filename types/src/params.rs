//! Staking parameters — fixed at construction, immutable afterwards.

use serde::{Deserialize, Serialize};

/// Parameters of a stake ledger.
///
/// Both values are set when the ledger is constructed and never change over
/// its lifetime. The reward rate is expressed in whole percent per
/// `min_staking_period_secs` of elapsed time beyond the minimum period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// Minimum time a stake must be held before it can be withdrawn.
    pub min_staking_period_secs: u64,

    /// Reward rate in whole percent, normalized per minimum staking period.
    pub reward_rate_percent: u128,
}

impl StakingParams {
    /// Reward rate of the live TENURE deployment.
    pub const DEFAULT_REWARD_RATE_PERCENT: u128 = 10;

    /// TENURE defaults — the intended configuration for the live network.
    pub fn tenure_defaults() -> Self {
        Self {
            min_staking_period_secs: 7 * 24 * 3600,
            reward_rate_percent: Self::DEFAULT_REWARD_RATE_PERCENT,
        }
    }
}

/// Default is the TENURE deployment configuration.
impl Default for StakingParams {
    fn default() -> Self {
        Self::tenure_defaults()
    }
}
