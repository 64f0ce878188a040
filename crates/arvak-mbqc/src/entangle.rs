//! Graph-state preparation and CZ scheduling.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use arvak_ir::Circuit;
use arvak_zx::{Diagram, VertexId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MbqcResult;
use crate::{qubit_of, width};

/// CZ rounds realizing a graph's edges. Pairs are stored as `(low, high)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub rounds: Vec<Vec<(VertexId, VertexId)>>,
}

impl Schedule {
    /// Total number of scheduled pairs.
    pub fn num_pairs(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    pub fn depth(&self) -> usize {
        self.rounds.len()
    }

    /// Every scheduled pair, round by round.
    pub fn pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.rounds.iter().flatten().copied()
    }
}

fn pair(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b { (a, b) } else { (b, a) }
}

/// Greedy matching of edges into rounds of disjoint pairs.
///
/// Each round walks the vertices by descending remaining degree (ties by
/// ascending id) and pairs every unmatched vertex with the first later
/// unmatched vertex it still shares an edge with.
pub fn entangle(diagram: &Diagram) -> Schedule {
    let mut pool: BTreeSet<(VertexId, VertexId)> =
        diagram.edges().into_iter().map(|(a, b, _)| (a, b)).collect();
    let mut rounds = Vec::new();

    while !pool.is_empty() {
        let mut degree: FxHashMap<VertexId, usize> = FxHashMap::default();
        for &(a, b) in &pool {
            *degree.entry(a).or_default() += 1;
            *degree.entry(b).or_default() += 1;
        }
        let mut order: Vec<VertexId> = degree.keys().copied().collect();
        order.sort_unstable_by_key(|v| (Reverse(degree[v]), *v));

        let mut matched = FxHashSet::default();
        let mut round = Vec::new();
        for (i, &v) in order.iter().enumerate() {
            if matched.contains(&v) {
                continue;
            }
            let partner = order[i + 1..]
                .iter()
                .copied()
                .find(|u| !matched.contains(u) && pool.contains(&pair(v, *u)));
            if let Some(u) = partner {
                matched.insert(v);
                matched.insert(u);
                pool.remove(&pair(v, u));
                round.push(pair(v, u));
            }
        }
        rounds.push(round);
    }

    debug!("Scheduled entangling in {} rounds", rounds.len());
    Schedule { rounds }
}

/// One CZ per edge over qubits `0..n`, with a barrier after every round.
pub fn entangling_circuit(diagram: &Diagram) -> MbqcResult<Circuit> {
    let n = width(diagram.vertex_bound());
    let mut circuit = Circuit::with_size("entangle", n, n);
    for round in entangle(diagram).rounds {
        for (a, b) in round {
            circuit.cz(qubit_of(a), qubit_of(b))?;
        }
        circuit.barrier_all()?;
    }
    Ok(circuit)
}

/// Hadamards putting every non-input vertex into |+⟩.
pub fn preparation_circuit(diagram: &Diagram) -> MbqcResult<Circuit> {
    let n = width(diagram.vertex_bound());
    let mut circuit = Circuit::with_size("prepare", n, n);
    for v in diagram.vertices() {
        if !diagram.is_input(v) {
            circuit.h(qubit_of(v))?;
        }
    }
    Ok(circuit)
}
