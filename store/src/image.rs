//! The serializable key-value image shared by the concrete backends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tenure_types::ParticipantAddress;

/// Everything a TENURE store holds, in one serializable value.
///
/// The stake and token meta spaces are kept separate so the two engines can
/// use the same backend instance without key collisions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct StoreImage {
    pub stakes: HashMap<ParticipantAddress, Vec<u8>>,
    pub stake_meta: HashMap<Vec<u8>, Vec<u8>>,
    pub accounts: HashMap<ParticipantAddress, Vec<u8>>,
    pub token_meta: HashMap<Vec<u8>, Vec<u8>>,
}
