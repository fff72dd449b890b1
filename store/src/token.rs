use crate::StoreError;
use tenure_types::ParticipantAddress;

/// Store trait for persisting token-ledger state to durable storage.
///
/// Account rows are opaque bytes for the same reason as [`crate::StakeStore`]:
/// the token ledger owns its own serialization.
pub trait TokenStore {
    fn get_account(&self, address: &ParticipantAddress) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_account(&self, address: &ParticipantAddress, account: &[u8]) -> Result<(), StoreError>;
    fn delete_account(&self, address: &ParticipantAddress) -> Result<(), StoreError>;
    fn iter_accounts(&self) -> Result<Vec<(ParticipantAddress, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
