//! Boundary role tracking across relabeling.
//!
//! Diagram vertex identifiers are slot indices that get reused, and pattern
//! qubits are renamed when segments are stitched together. An [`IoMap`]
//! keeps the input and output role of every original circuit qubit pinned
//! to whatever identifier currently holds it.

use std::collections::BTreeMap;
use std::fmt;

use arvak_ir::QubitId;
use arvak_zx::{Diagram, VertexId};
use serde::{Deserialize, Serialize};

use crate::error::{MbqcError, MbqcResult};

/// One of the two boundary roles of a circuit qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Input,
    Output,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Input => write!(f, "input"),
            Role::Output => write!(f, "output"),
        }
    }
}

/// Input and output role of each original qubit, keyed by that qubit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoMap<T> {
    /// Holder of each qubit's input role.
    pub inputs: BTreeMap<QubitId, T>,
    /// Holder of each qubit's output role.
    pub outputs: BTreeMap<QubitId, T>,
}

impl<T> Default for IoMap<T> {
    fn default() -> Self {
        Self {
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl<T: Copy + Eq> IoMap<T> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, role: Role) -> &BTreeMap<QubitId, T> {
        match role {
            Role::Input => &self.inputs,
            Role::Output => &self.outputs,
        }
    }

    /// Record that `id` holds `role` of `qubit`.
    pub fn insert(&mut self, role: Role, qubit: QubitId, id: T) {
        match role {
            Role::Input => self.inputs.insert(qubit, id),
            Role::Output => self.outputs.insert(qubit, id),
        };
    }

    /// The holder of `role` of `qubit`.
    pub fn get(&self, role: Role, qubit: QubitId) -> Option<T> {
        self.side(role).get(&qubit).copied()
    }

    /// Number of qubits with an input role.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Check whether no roles are recorded.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    /// Every entry as `(role, qubit, holder)`, inputs first.
    pub fn entries(&self) -> impl Iterator<Item = (Role, QubitId, T)> + '_ {
        self.inputs
            .iter()
            .map(|(&q, &id)| (Role::Input, q, id))
            .chain(self.outputs.iter().map(|(&q, &id)| (Role::Output, q, id)))
    }

    /// Check whether `id` holds any role.
    pub fn holds(&self, id: T) -> bool {
        self.inputs.values().chain(self.outputs.values()).any(|&h| h == id)
    }

    /// Move every role held by `from` onto `to`. Returns how many moved.
    pub fn replace(&mut self, from: T, to: T) -> usize {
        let mut moved = 0;
        for holder in self.inputs.values_mut().chain(self.outputs.values_mut()) {
            if *holder == from {
                *holder = to;
                moved += 1;
            }
        }
        moved
    }

    /// Rewrite every holder through `f`.
    pub fn relabel(&mut self, f: impl Fn(T) -> T) {
        for holder in self.inputs.values_mut().chain(self.outputs.values_mut()) {
            *holder = f(*holder);
        }
    }

    /// The same roles with holders converted through `f`.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> IoMap<U> {
        IoMap {
            inputs: self.inputs.iter().map(|(&q, &id)| (q, f(id))).collect(),
            outputs: self.outputs.iter().map(|(&q, &id)| (q, f(id))).collect(),
        }
    }
}

impl IoMap<VertexId> {
    /// Read the roles off a freshly built diagram.
    ///
    /// Entry `k` of the diagram's inputs and outputs belongs to `qubits[k]`.
    pub fn from_diagram(diagram: &Diagram, qubits: &[QubitId]) -> Self {
        let mut map = Self::new();
        for (&q, &v) in qubits.iter().zip(diagram.inputs()) {
            map.insert(Role::Input, q, v);
        }
        for (&q, &v) in qubits.iter().zip(diagram.outputs()) {
            map.insert(Role::Output, q, v);
        }
        map
    }

    /// Verify that every holder is a live vertex carrying the matching role.
    pub fn check(&self, diagram: &Diagram) -> MbqcResult<()> {
        for (role, _, v) in self.entries() {
            let held = match role {
                Role::Input => diagram.is_input(v),
                Role::Output => diagram.is_output(v),
            };
            if !diagram.contains(v) || !held {
                return Err(MbqcError::InconsistentIoMap { role, vertex: v });
            }
        }
        Ok(())
    }
}

impl IoMap<QubitId> {
    /// Check that no qubit holds two output roles.
    pub fn outputs_distinct(&self) -> bool {
        let mut seen = rustc_hash::FxHashSet::default();
        self.outputs.values().all(|q| seen.insert(*q))
    }
}
