//! Persist the stake ledger through the `StakeStore` trait.
//!
//! One row per active stake, globals under meta keys. `total_staked` is
//! recomputed from the rows on load, so the store can never disagree with
//! the table it holds. The event journal is transient and not persisted.

use std::collections::HashMap;

use crate::engine::StakeLedger;
use crate::error::StakingError;
use crate::record::StakeRecord;
use tenure_store::StakeStore;
use tenure_types::{ParticipantAddress, StakingParams};

const META_OWNER: &[u8] = b"owner";
const META_CUSTODIAN: &[u8] = b"custodian";
const META_PARAMS: &[u8] = b"params";

impl StakeLedger {
    /// Persist all ledger state to a stake store.
    pub fn save_to_store(&self, store: &dyn StakeStore) -> Result<(), StakingError> {
        store
            .put_meta(META_OWNER, self.owner().as_str().as_bytes())
            .map_err(|e| StakingError::Store(e.to_string()))?;
        store
            .put_meta(META_CUSTODIAN, self.custodian().as_str().as_bytes())
            .map_err(|e| StakingError::Store(e.to_string()))?;
        let params_bytes =
            bincode::serialize(self.params()).map_err(|e| StakingError::Store(e.to_string()))?;
        store
            .put_meta(META_PARAMS, &params_bytes)
            .map_err(|e| StakingError::Store(e.to_string()))?;

        for (address, record) in self.stake_entries() {
            let bytes =
                bincode::serialize(record).map_err(|e| StakingError::Store(e.to_string()))?;
            store
                .put_stake_record(address, &bytes)
                .map_err(|e| StakingError::Store(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore a ledger from a stake store.
    pub fn load_from_store(store: &dyn StakeStore) -> Result<Self, StakingError> {
        let owner = read_address(store, META_OWNER)?;
        let custodian = read_address(store, META_CUSTODIAN)?;

        let params: StakingParams = match store
            .get_meta(META_PARAMS)
            .map_err(|e| StakingError::Store(e.to_string()))?
        {
            Some(bytes) => {
                bincode::deserialize(&bytes).map_err(|e| StakingError::Store(e.to_string()))?
            }
            None => StakingParams::tenure_defaults(),
        };

        let entries = store
            .iter_stake_records()
            .map_err(|e| StakingError::Store(e.to_string()))?;
        let mut stakes = HashMap::new();
        for (address, bytes) in entries {
            let record: StakeRecord =
                bincode::deserialize(&bytes).map_err(|e| StakingError::Store(e.to_string()))?;
            if record.is_active() {
                stakes.insert(address, record);
            }
        }

        Ok(StakeLedger::restore(owner, custodian, params, stakes))
    }
}

fn read_address(store: &dyn StakeStore, key: &[u8]) -> Result<ParticipantAddress, StakingError> {
    match store
        .get_meta(key)
        .map_err(|e| StakingError::Store(e.to_string()))?
    {
        Some(bytes) => {
            let raw = String::from_utf8(bytes).map_err(|e| StakingError::Store(e.to_string()))?;
            Ok(ParticipantAddress::new(raw))
        }
        None => Err(StakingError::Store(format!(
            "store holds no {}",
            String::from_utf8_lossy(key)
        ))),
    }
}
