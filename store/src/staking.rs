use crate::StoreError;
use tenure_types::ParticipantAddress;

/// Store trait for persisting stake-ledger state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `tenure-staking`
/// crate (which would create a circular dependency). The stake ledger
/// serializes/deserializes its own types.
pub trait StakeStore {
    fn get_stake_record(&self, address: &ParticipantAddress) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_stake_record(&self, address: &ParticipantAddress, record: &[u8]) -> Result<(), StoreError>;
    fn delete_stake_record(&self, address: &ParticipantAddress) -> Result<(), StoreError>;
    fn iter_stake_records(&self) -> Result<Vec<(ParticipantAddress, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
