//! Ledger snapshots — capture every balance and allowance at a point in time.
//!
//! A snapshot carries a deterministic Blake2b-256 hash of its contents so a
//! consumer can verify integrity after transport or storage.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::TokenError;
use crate::ledger::{TokenInfo, TokenLedger};
use tenure_types::{ParticipantAddress, Timestamp};

/// A token-ledger snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenSnapshot {
    /// Blake2b-256 of the serialized account entries.
    pub hash: [u8; 32],
    /// When the snapshot was taken.
    pub created_at: Timestamp,
    /// Token metadata at snapshot time.
    pub info: TokenInfo,
    /// The minter authority.
    pub minter: ParticipantAddress,
    /// Total supply across all accounts.
    pub total_supply: u128,
    /// Account entries, sorted by address for determinism.
    pub accounts: Vec<AccountSnapshot>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

/// One account captured in a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: ParticipantAddress,
    pub balance: u128,
    /// Allowances this account has granted, sorted by spender.
    pub allowances: Vec<(ParticipantAddress, u128)>,
}

impl TokenSnapshot {
    /// Capture the current state of `ledger` at `now`.
    pub fn capture(ledger: &TokenLedger, now: Timestamp) -> Self {
        let mut grants: HashMap<ParticipantAddress, Vec<(ParticipantAddress, u128)>> =
            HashMap::new();
        for ((owner, spender), amount) in ledger.allowance_entries() {
            grants
                .entry(owner.clone())
                .or_default()
                .push((spender.clone(), *amount));
        }

        let mut accounts: Vec<AccountSnapshot> = ledger
            .accounts()
            .iter()
            .map(|(address, balance)| {
                let mut allowances = grants.remove(address).unwrap_or_default();
                allowances.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
                AccountSnapshot {
                    address: address.clone(),
                    balance: *balance,
                    allowances,
                }
            })
            .collect();
        // Accounts that only granted allowances still appear.
        for (address, mut allowances) in grants {
            allowances.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
            accounts.push(AccountSnapshot {
                address,
                balance: 0,
                allowances,
            });
        }
        accounts.sort_by(|a, b| a.address.as_str().cmp(b.address.as_str()));

        let mut snap = Self {
            hash: [0u8; 32],
            created_at: now,
            info: ledger.info().clone(),
            minter: ledger.minter().clone(),
            total_supply: ledger.total_supply(),
            accounts,
            version: 1,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Rebuild a ledger from a snapshot.
    pub fn into_ledger(self) -> Result<TokenLedger, TokenError> {
        if !self.verify() {
            return Err(TokenError::Other("snapshot hash mismatch".into()));
        }
        let mut balances = HashMap::new();
        let mut allowances = HashMap::new();
        for account in &self.accounts {
            if account.balance > 0 {
                balances.insert(account.address.clone(), account.balance);
            }
            for (spender, amount) in &account.allowances {
                allowances.insert((account.address.clone(), spender.clone()), *amount);
            }
        }
        Ok(TokenLedger::restore(
            self.info,
            self.minter,
            self.total_supply,
            balances,
            allowances,
        ))
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.minter.as_str().as_bytes());
        hasher.update(self.total_supply.to_le_bytes());
        for account in &self.accounts {
            hasher.update(account.address.as_str().as_bytes());
            hasher.update(account.balance.to_le_bytes());
            for (spender, amount) in &account.allowances {
                hasher.update(spender.as_str().as_bytes());
                hasher.update(amount.to_le_bytes());
            }
        }
        hasher.update(self.created_at.as_secs().to_le_bytes());

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the account data.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, TokenError> {
        bincode::serialize(self).map_err(|e| TokenError::Other(e.to_string()))
    }

    /// Deserialize a snapshot from bytes, verifying its hash.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        let snap: Self =
            bincode::deserialize(bytes).map_err(|e| TokenError::Other(e.to_string()))?;
        if !snap.verify() {
            return Err(TokenError::Other("snapshot hash mismatch".into()));
        }
        Ok(snap)
    }

    /// Write the snapshot to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), TokenError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| TokenError::Other(e.to_string()))
    }

    /// Read and verify a snapshot from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, TokenError> {
        let bytes = fs::read(path).map_err(|e| TokenError::Other(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
