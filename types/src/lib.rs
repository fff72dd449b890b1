//! Fundamental types for the TENURE staking ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: participant addresses, timestamps, the clock capability, and
//! staking parameters.

pub mod address;
pub mod params;
pub mod time;

pub use address::ParticipantAddress;
pub use params::StakingParams;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
