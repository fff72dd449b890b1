//! Abstract storage traits for TENURE.
//!
//! Every storage backend (file-backed, in-memory for testing) implements
//! these traits. The engine crates depend only on the traits and
//! serialize/deserialize their own types, so the store never needs to know
//! about engine internals.

pub mod error;
pub mod file;
mod image;
pub mod memory;
pub mod staking;
pub mod token;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use staking::StakeStore;
pub use token::TokenStore;
