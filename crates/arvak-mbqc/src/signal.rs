//! Byproduct signals.
//!
//! A signal is the parity of a set of measurement outcomes, optionally
//! negated. XOR keeps the constant part folded and takes the symmetric
//! difference of the measured parts, so `s ^ s` is always known false.

use std::collections::BTreeSet;
use std::ops::BitXorAssign;

use arvak_zx::VertexId;

/// Parity of measurement outcomes plus a constant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signal {
    /// Constant term.
    pub parity: bool,
    /// Vertices whose outcomes enter the parity.
    pub pending: BTreeSet<VertexId>,
}

/// A signal reduced to what the circuit has to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Fixed at compile time.
    Known(bool),
    /// `XOR(bits) ^ negate`, decided at run time.
    Pending { bits: Vec<VertexId>, negate: bool },
}

impl Signal {
    /// A signal with a fixed value.
    pub fn known(value: bool) -> Self {
        Self {
            parity: value,
            pending: BTreeSet::new(),
        }
    }

    /// The outcome of measuring `v`.
    pub fn measured(v: VertexId) -> Self {
        Self {
            parity: false,
            pending: BTreeSet::from([v]),
        }
    }

    pub fn resolve(&self) -> Resolved {
        if self.pending.is_empty() {
            Resolved::Known(self.parity)
        } else {
            Resolved::Pending {
                bits: self.pending.iter().copied().collect(),
                negate: self.parity,
            }
        }
    }
}

impl BitXorAssign<&Signal> for Signal {
    fn bitxor_assign(&mut self, rhs: &Signal) {
        self.parity ^= rhs.parity;
        for &v in &rhs.pending {
            if !self.pending.remove(&v) {
                self.pending.insert(v);
            }
        }
    }
}

impl BitXorAssign<bool> for Signal {
    fn bitxor_assign(&mut self, rhs: bool) {
        self.parity ^= rhs;
    }
}
