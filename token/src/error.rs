//! Token-ledger errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: u128, approved: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("caller is not authorized to mint")]
    Unauthorized,

    #[error("arithmetic overflow in token computation")]
    Overflow,

    #[error("{0}")]
    Other(String),
}
