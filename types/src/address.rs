//! Participant address type with `tnr_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A TENURE participant address, always prefixed with `tnr_`.
///
/// Identifies an account on the asset ledger and a row in the stake table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantAddress(String);

impl ParticipantAddress {
    /// The standard prefix for all TENURE addresses.
    pub const PREFIX: &'static str = "tnr_";

    /// Create a new participant address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `tnr_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with tnr_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for ParticipantAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ParticipantAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
