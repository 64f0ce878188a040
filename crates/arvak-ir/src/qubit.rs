//! Qubit and classical bit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit wire.
///
/// Pattern circuits number their qubits after graph vertices, so identifiers
/// are ordered and need not be contiguous within a circuit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The raw index, usable as a slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Identifier of a classical bit wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The raw index, usable as a slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Shift this bit by `offset` positions.
    #[inline]
    #[must_use]
    pub fn offset(self, offset: u32) -> Self {
        ClbitId(self.0 + offset)
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}
