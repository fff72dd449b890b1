//! In-memory store backend for tests and simulations.

use std::sync::Mutex;

use crate::image::StoreImage;
use crate::{StakeStore, StoreError, TokenStore};
use tenure_types::ParticipantAddress;

/// A store that lives entirely in memory.
///
/// Implements both store traits so a single instance can back the token
/// ledger and the stake ledger at once, the way a single database would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreImage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_image<T>(&self, f: impl FnOnce(&mut StoreImage) -> T) -> Result<T, StoreError> {
        let mut image = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        Ok(f(&mut image))
    }
}

impl StakeStore for MemoryStore {
    fn get_stake_record(&self, address: &ParticipantAddress) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_image(|img| img.stakes.get(address).cloned())
    }

    fn put_stake_record(&self, address: &ParticipantAddress, record: &[u8]) -> Result<(), StoreError> {
        self.with_image(|img| {
            img.stakes.insert(address.clone(), record.to_vec());
        })
    }

    fn delete_stake_record(&self, address: &ParticipantAddress) -> Result<(), StoreError> {
        self.with_image(|img| {
            img.stakes.remove(address);
        })
    }

    fn iter_stake_records(&self) -> Result<Vec<(ParticipantAddress, Vec<u8>)>, StoreError> {
        self.with_image(|img| {
            img.stakes
                .iter()
                .map(|(addr, bytes)| (addr.clone(), bytes.clone()))
                .collect()
        })
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_image(|img| img.stake_meta.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.with_image(|img| {
            img.stake_meta.insert(key.to_vec(), value.to_vec());
        })
    }
}

impl TokenStore for MemoryStore {
    fn get_account(&self, address: &ParticipantAddress) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_image(|img| img.accounts.get(address).cloned())
    }

    fn put_account(&self, address: &ParticipantAddress, account: &[u8]) -> Result<(), StoreError> {
        self.with_image(|img| {
            img.accounts.insert(address.clone(), account.to_vec());
        })
    }

    fn delete_account(&self, address: &ParticipantAddress) -> Result<(), StoreError> {
        self.with_image(|img| {
            img.accounts.remove(address);
        })
    }

    fn iter_accounts(&self) -> Result<Vec<(ParticipantAddress, Vec<u8>)>, StoreError> {
        self.with_image(|img| {
            img.accounts
                .iter()
                .map(|(addr, bytes)| (addr.clone(), bytes.clone()))
                .collect()
        })
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_image(|img| img.token_meta.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.with_image(|img| {
            img.token_meta.insert(key.to_vec(), value.to_vec());
        })
    }
}
