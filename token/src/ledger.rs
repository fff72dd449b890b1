//! The fungible-token ledger: balances, allowances, minting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::asset::AssetLedger;
use crate::error::TokenError;
use tenure_types::ParticipantAddress;

/// Token metadata, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    /// Metadata of the TENURE deployment token.
    pub fn tenure() -> Self {
        Self {
            name: "Tenure".to_string(),
            symbol: "TNR".to_string(),
            decimals: 9,
        }
    }
}

/// The asset ledger: one balance per account, one allowance per
/// (owner, spender) pair, and a single minter authority.
///
/// All mutation goes through checked arithmetic with every precondition
/// verified before the first write, so a returned error means the ledger is
/// byte-for-byte what it was before the call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    info: TokenInfo,
    minter: ParticipantAddress,
    total_supply: u128,
    balances: HashMap<ParticipantAddress, u128>,
    allowances: HashMap<(ParticipantAddress, ParticipantAddress), u128>,
}

impl TokenLedger {
    pub fn new(minter: ParticipantAddress, info: TokenInfo) -> Self {
        Self {
            info,
            minter,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    pub fn minter(&self) -> &ParticipantAddress {
        &self.minter
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Allowance `owner` has granted `spender`; zero if never approved.
    pub fn allowance(&self, owner: &ParticipantAddress, spender: &ParticipantAddress) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Mint `amount` new tokens to `to`. Only the minter may mint.
    pub fn mint(
        &mut self,
        caller: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        if caller != &self.minter {
            return Err(TokenError::Unauthorized);
        }
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self.balances.get(to).copied().unwrap_or(0);
        let new_balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.total_supply = new_supply;
        self.balances.insert(to.clone(), new_balance);
        Ok(())
    }

    /// Set (not add to) the allowance `owner` grants `spender`.
    ///
    /// A zero amount clears the entry entirely.
    pub fn approve(
        &mut self,
        owner: &ParticipantAddress,
        spender: &ParticipantAddress,
        amount: u128,
    ) {
        let key = (owner.clone(), spender.clone());
        if amount == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, amount);
        }
    }

    /// Number of accounts with a nonzero balance.
    pub fn account_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    pub(crate) fn accounts(&self) -> &HashMap<ParticipantAddress, u128> {
        &self.balances
    }

    pub(crate) fn allowance_entries(
        &self,
    ) -> &HashMap<(ParticipantAddress, ParticipantAddress), u128> {
        &self.allowances
    }

    pub(crate) fn restore(
        info: TokenInfo,
        minter: ParticipantAddress,
        total_supply: u128,
        balances: HashMap<ParticipantAddress, u128>,
        allowances: HashMap<(ParticipantAddress, ParticipantAddress), u128>,
    ) -> Self {
        Self {
            info,
            minter,
            total_supply,
            balances,
            allowances,
        }
    }

    /// Debit `from` and credit `to` after all preconditions passed.
    fn move_balance(
        &mut self,
        from: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available: from_balance,
            });
        }
        // Self-transfer nets to zero.
        if from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(to);
        let new_to = to_balance.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), new_to);
        Ok(())
    }
}

impl AssetLedger for TokenLedger {
    fn balance_of(&self, address: &ParticipantAddress) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &ParticipantAddress,
        from: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let approved = self.allowance(from, spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        self.move_balance(from, to, amount)?;
        // Allowance is debited only after the move succeeded.
        self.approve(from, spender, approved - amount);
        Ok(())
    }
}
