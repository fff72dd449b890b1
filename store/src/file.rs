//! File-backed store: one bincode image per ledger, flushed on every write.
//!
//! The whole image is loaded at open and rewritten after each mutation.
//! Suitable for the dataset sizes this ledger targets; larger deployments
//! would swap in a paging backend behind the same traits.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::image::StoreImage;
use crate::{StakeStore, StoreError, TokenStore};
use tenure_types::ParticipantAddress;

/// A store persisted as a single bincode file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<StoreImage>,
}

impl FileStore {
    /// Open a store at `path`, loading the existing image if one is present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let image = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| StoreError::Backend(e.to_string()))?;
            bincode::deserialize(&bytes).map_err(|e| StoreError::Corruption(e.to_string()))?
        } else {
            StoreImage::default()
        };
        Ok(Self {
            path,
            inner: Mutex::new(image),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreImage) -> T) -> Result<T, StoreError> {
        let mut image = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        let out = f(&mut image);
        let bytes =
            bincode::serialize(&*image).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(out)
    }

    fn read<T>(&self, f: impl FnOnce(&StoreImage) -> T) -> Result<T, StoreError> {
        let image = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        Ok(f(&image))
    }
}

impl StakeStore for FileStore {
    fn get_stake_record(&self, address: &ParticipantAddress) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(|img| img.stakes.get(address).cloned())
    }

    fn put_stake_record(&self, address: &ParticipantAddress, record: &[u8]) -> Result<(), StoreError> {
        self.mutate(|img| {
            img.stakes.insert(address.clone(), record.to_vec());
        })
    }

    fn delete_stake_record(&self, address: &ParticipantAddress) -> Result<(), StoreError> {
        self.mutate(|img| {
            img.stakes.remove(address);
        })
    }

    fn iter_stake_records(&self) -> Result<Vec<(ParticipantAddress, Vec<u8>)>, StoreError> {
        self.read(|img| {
            img.stakes
                .iter()
                .map(|(addr, bytes)| (addr.clone(), bytes.clone()))
                .collect()
        })
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(|img| img.stake_meta.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.mutate(|img| {
            img.stake_meta.insert(key.to_vec(), value.to_vec());
        })
    }
}

impl TokenStore for FileStore {
    fn get_account(&self, address: &ParticipantAddress) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(|img| img.accounts.get(address).cloned())
    }

    fn put_account(&self, address: &ParticipantAddress, account: &[u8]) -> Result<(), StoreError> {
        self.mutate(|img| {
            img.accounts.insert(address.clone(), account.to_vec());
        })
    }

    fn delete_account(&self, address: &ParticipantAddress) -> Result<(), StoreError> {
        self.mutate(|img| {
            img.accounts.remove(address);
        })
    }

    fn iter_accounts(&self) -> Result<Vec<(ParticipantAddress, Vec<u8>)>, StoreError> {
        self.read(|img| {
            img.accounts
                .iter()
                .map(|(addr, bytes)| (addr.clone(), bytes.clone()))
                .collect()
        })
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(|img| img.token_meta.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.mutate(|img| {
            img.token_meta.insert(key.to_vec(), value.to_vec());
        })
    }
}
