//! Persist the token ledger through the `TokenStore` trait.
//!
//! One store row per account (balance plus the allowances that account has
//! granted), globals under meta keys. The ledger owns its serialization; the
//! store only sees opaque bytes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::ledger::{TokenInfo, TokenLedger};
use tenure_store::TokenStore;
use tenure_types::ParticipantAddress;

const META_INFO: &[u8] = b"token_info";
const META_MINTER: &[u8] = b"minter";
const META_TOTAL_SUPPLY: &[u8] = b"total_supply";

/// Store row for a single account.
#[derive(Debug, Serialize, Deserialize)]
struct AccountRow {
    balance: u128,
    /// Allowances this account has granted: (spender, amount).
    granted: Vec<(ParticipantAddress, u128)>,
}

impl TokenLedger {
    /// Persist all ledger state to a token store.
    pub fn save_to_store(&self, store: &dyn TokenStore) -> Result<(), TokenError> {
        let info_bytes =
            bincode::serialize(self.info()).map_err(|e| TokenError::Other(e.to_string()))?;
        store
            .put_meta(META_INFO, &info_bytes)
            .map_err(|e| TokenError::Other(e.to_string()))?;
        store
            .put_meta(META_MINTER, self.minter().as_str().as_bytes())
            .map_err(|e| TokenError::Other(e.to_string()))?;
        store
            .put_meta(META_TOTAL_SUPPLY, &self.total_supply().to_be_bytes())
            .map_err(|e| TokenError::Other(e.to_string()))?;

        let mut rows: HashMap<ParticipantAddress, AccountRow> = self
            .accounts()
            .iter()
            .map(|(address, balance)| {
                (
                    address.clone(),
                    AccountRow {
                        balance: *balance,
                        granted: Vec::new(),
                    },
                )
            })
            .collect();
        for ((owner, spender), amount) in self.allowance_entries() {
            rows.entry(owner.clone())
                .or_insert(AccountRow {
                    balance: 0,
                    granted: Vec::new(),
                })
                .granted
                .push((spender.clone(), *amount));
        }

        for (address, row) in &rows {
            let bytes = bincode::serialize(row).map_err(|e| TokenError::Other(e.to_string()))?;
            store
                .put_account(address, &bytes)
                .map_err(|e| TokenError::Other(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore a ledger from a token store.
    pub fn load_from_store(store: &dyn TokenStore) -> Result<Self, TokenError> {
        let info = match store
            .get_meta(META_INFO)
            .map_err(|e| TokenError::Other(e.to_string()))?
        {
            Some(bytes) => {
                bincode::deserialize(&bytes).map_err(|e| TokenError::Other(e.to_string()))?
            }
            None => TokenInfo::tenure(),
        };

        let minter = match store
            .get_meta(META_MINTER)
            .map_err(|e| TokenError::Other(e.to_string()))?
        {
            Some(bytes) => {
                let raw = String::from_utf8(bytes)
                    .map_err(|e| TokenError::Other(e.to_string()))?;
                ParticipantAddress::new(raw)
            }
            None => return Err(TokenError::Other("store holds no minter".into())),
        };

        let total_supply = match store
            .get_meta(META_TOTAL_SUPPLY)
            .map_err(|e| TokenError::Other(e.to_string()))?
        {
            Some(bytes) if bytes.len() >= 16 => {
                u128::from_be_bytes(
                    bytes[..16]
                        .try_into()
                        .map_err(|_| TokenError::Other("malformed total_supply".into()))?,
                )
            }
            _ => 0,
        };

        let entries = store
            .iter_accounts()
            .map_err(|e| TokenError::Other(e.to_string()))?;
        let mut balances = HashMap::new();
        let mut allowances = HashMap::new();
        for (address, bytes) in entries {
            let row: AccountRow =
                bincode::deserialize(&bytes).map_err(|e| TokenError::Other(e.to_string()))?;
            if row.balance > 0 {
                balances.insert(address.clone(), row.balance);
            }
            for (spender, amount) in row.granted {
                allowances.insert((address.clone(), spender), amount);
            }
        }

        Ok(TokenLedger::restore(
            info,
            minter,
            total_supply,
            balances,
            allowances,
        ))
    }
}
