//! Stake-ledger errors.
//!
//! Every error is a named precondition; a returned error means the operation
//! had no effect on either the stake table or the asset ledger.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("stake amount must be greater than zero")]
    InvalidAmount,

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("staking period not met: {elapsed}s elapsed of {required}s required")]
    StakingPeriodNotMet { elapsed: u64, required: u64 },

    #[error("participant has no active stake")]
    NothingStaked,

    #[error("caller lacks permission for this operation")]
    Unauthorized,

    #[error("reward funds exhausted: need {needed}, available {available}")]
    InsufficientRewardFunds { needed: u128, available: u128 },

    #[error("arithmetic overflow in stake computation")]
    Overflow,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("stake ledger lock poisoned")]
    LockPoisoned,

    #[error("asset ledger error: {0}")]
    Asset(#[from] tenure_token::TokenError),
}
