//! Per-participant stake state.

use serde::{Deserialize, Serialize};
use tenure_types::Timestamp;

/// A participant's stake: principal plus the time of the last stake action.
///
/// Every stake action resets `since`, so topping up an existing stake
/// restarts the withdrawal gate for the whole position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Staked principal in the asset's smallest denomination.
    pub amount: u128,
    /// When the participant last staked.
    pub since: Timestamp,
}

impl StakeRecord {
    pub fn new(amount: u128, since: Timestamp) -> Self {
        Self { amount, since }
    }

    /// A zero amount is equivalent to "not staking".
    pub fn is_active(&self) -> bool {
        self.amount > 0
    }

    /// Whether the minimum staking period has passed relative to `now`.
    pub fn matured(&self, min_period_secs: u64, now: Timestamp) -> bool {
        self.since.has_expired(min_period_secs, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_inactive() {
        let record = StakeRecord::new(0, Timestamp::new(100));
        assert!(!record.is_active());
        assert!(StakeRecord::new(1, Timestamp::new(100)).is_active());
    }

    #[test]
    fn maturity_is_inclusive_at_the_boundary() {
        let record = StakeRecord::new(500, Timestamp::new(1_000));
        assert!(!record.matured(60, Timestamp::new(1_059)));
        assert!(record.matured(60, Timestamp::new(1_060)));
    }
}
