//! Observable side effects of stake-ledger operations.
//!
//! Mutating operations append to an in-ledger journal; consumers read or
//! drain it to observe what happened. A failed operation never journals.

use serde::{Deserialize, Serialize};
use tenure_types::{ParticipantAddress, Timestamp};

/// Emitted when a stake is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensStaked {
    pub participant: ParticipantAddress,
    pub amount: u128,
    pub timestamp: Timestamp,
}

/// Emitted when a stake is withdrawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensUnstaked {
    pub participant: ParticipantAddress,
    pub principal: u128,
    pub reward: u128,
    pub timestamp: Timestamp,
}

/// A journal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeEvent {
    Staked(TokensStaked),
    Unstaked(TokensUnstaked),
}
