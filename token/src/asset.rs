//! The asset-ledger seam consumed by the staking engine.

use crate::error::TokenError;
use tenure_types::ParticipantAddress;

/// A fungible-asset ledger the stake ledger can move custody through.
///
/// There is no ambient caller in a library setting, so the moving party is
/// always an explicit argument: `transfer` spends `from`'s own balance,
/// `transfer_from` spends `from`'s balance against `spender`'s allowance.
pub trait AssetLedger {
    /// Current balance of `address`; zero for unknown accounts.
    fn balance_of(&self, address: &ParticipantAddress) -> u128;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`,
    /// debiting `spender`'s allowance granted by `from`.
    fn transfer_from(
        &mut self,
        spender: &ParticipantAddress,
        from: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), TokenError>;
}
