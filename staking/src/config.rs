//! Stake-ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::StakeLedger;
use crate::error::StakingError;
use tenure_types::{ParticipantAddress, StakingParams};

/// Configuration for a stake ledger.
///
/// Can be loaded from a TOML file via [`StakingConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Everything here is fixed at
/// construction — there is no runtime reconfiguration surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Address that may use the administrative surface.
    pub owner: ParticipantAddress,

    /// The ledger's custody account on the asset ledger.
    pub custodian: ParticipantAddress,

    /// Minimum time a stake must be held before withdrawal.
    #[serde(default = "default_min_staking_period")]
    pub min_staking_period_secs: u64,

    /// Reward rate in whole percent per minimum staking period.
    #[serde(default = "default_reward_rate")]
    pub reward_rate_percent: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_staking_period() -> u64 {
    StakingParams::tenure_defaults().min_staking_period_secs
}

fn default_reward_rate() -> u64 {
    StakingParams::DEFAULT_REWARD_RATE_PERCENT as u64
}

impl StakingConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, StakingError> {
        let config: Self =
            toml::from_str(text).map_err(|e| StakingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, StakingError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StakingError::Config(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), StakingError> {
        if !self.owner.is_valid() {
            return Err(StakingError::Config(format!(
                "malformed owner address: {}",
                self.owner
            )));
        }
        if !self.custodian.is_valid() {
            return Err(StakingError::Config(format!(
                "malformed custodian address: {}",
                self.custodian
            )));
        }
        if self.owner == self.custodian {
            return Err(StakingError::Config(
                "owner and custodian must be distinct accounts".into(),
            ));
        }
        if self.min_staking_period_secs == 0 {
            return Err(StakingError::Config(
                "minimum staking period must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn params(&self) -> StakingParams {
        StakingParams {
            min_staking_period_secs: self.min_staking_period_secs,
            reward_rate_percent: u128::from(self.reward_rate_percent),
        }
    }

    /// Build a fresh stake ledger from this configuration.
    pub fn build(self) -> Result<StakeLedger, StakingError> {
        self.validate()?;
        let params = self.params();
        Ok(StakeLedger::new(self.owner, self.custodian, params))
    }
}
