//! Generalized flow on open graphs.
//!
//! The diagram is read as an open graph: vertices, adjacency (edge kinds are
//! ignored) and the input and output sets. Layers are found backwards from
//! the outputs. At each step a vertex `u` joins the next layer when some set
//! `K` of already layered non-input vertices has odd neighborhood meeting
//! the unlayered vertices in exactly `{u}`. Finding `K` is a linear system
//! over GF(2), solved once per step for every candidate.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagram::{Diagram, VertexId};

/// A generalized flow: a layering and one correction set per measured vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GFlow {
    /// Layer of every vertex. Outputs sit in layer 0.
    pub layers: BTreeMap<VertexId, usize>,
    /// Correction set of every non-output vertex.
    pub corrections: BTreeMap<VertexId, BTreeSet<VertexId>>,
}

impl GFlow {
    /// Number of layers, including the output layer.
    pub fn depth(&self) -> usize {
        self.layers.values().max().map_or(0, |&m| m + 1)
    }

    /// Vertices of layer `k` in ascending order.
    pub fn layer(&self, k: usize) -> Vec<VertexId> {
        self.layers
            .iter()
            .filter(|&(_, &l)| l == k)
            .map(|(&v, _)| v)
            .collect()
    }

    /// Correction set of `v`.
    pub fn correction(&self, v: VertexId) -> Option<&BTreeSet<VertexId>> {
        self.corrections.get(&v)
    }
}

/// Compute a maximally delayed generalized flow, or `None` if none exists.
pub fn gflow(diagram: &Diagram) -> Option<GFlow> {
    let inputs: BTreeSet<_> = diagram.inputs().iter().copied().collect();
    let mut processed: BTreeSet<_> = diagram.outputs().iter().copied().collect();
    let mut correctors: Vec<_> = processed.difference(&inputs).copied().collect();

    let mut layers: BTreeMap<_, _> = processed.iter().map(|&v| (v, 0)).collect();
    let mut corrections = BTreeMap::new();

    for k in 1.. {
        let unprocessed: Vec<_> = diagram
            .vertices()
            .into_iter()
            .filter(|v| !processed.contains(v))
            .collect();
        if unprocessed.is_empty() {
            break;
        }

        let matrix: Vec<Vec<bool>> = unprocessed
            .iter()
            .map(|&u| {
                correctors
                    .iter()
                    .map(|&c| diagram.connected(u, c))
                    .collect()
            })
            .collect();
        let system = Echelon::new(matrix, correctors.len());

        let mut found = Vec::new();
        for (row, &u) in unprocessed.iter().enumerate() {
            if let Some(solution) = system.solve_unit(row) {
                let set: BTreeSet<_> = correctors
                    .iter()
                    .zip(solution)
                    .filter_map(|(&c, bit)| bit.then_some(c))
                    .collect();
                corrections.insert(u, set);
                layers.insert(u, k);
                found.push(u);
            }
        }

        if found.is_empty() {
            debug!("No generalized flow: {} vertices unlayered", unprocessed.len());
            return None;
        }
        for u in found {
            processed.insert(u);
            if !inputs.contains(&u) {
                correctors.push(u);
            }
        }
        correctors.sort_unstable();
    }

    Some(GFlow {
        layers,
        corrections,
    })
}

/// Reduced row echelon form of a GF(2) matrix, with the row operations
/// that produced it.
struct Echelon {
    transform: Vec<Vec<bool>>,
    pivots: Vec<(usize, usize)>,
    cols: usize,
}

impl Echelon {
    fn new(mut matrix: Vec<Vec<bool>>, cols: usize) -> Self {
        let rows = matrix.len();
        let mut transform: Vec<Vec<bool>> = (0..rows)
            .map(|i| (0..rows).map(|j| i == j).collect())
            .collect();
        let mut pivots = Vec::new();

        let mut rank = 0;
        for col in 0..cols {
            if rank == rows {
                break;
            }
            let Some(p) = (rank..rows).find(|&i| matrix[i][col]) else {
                continue;
            };
            matrix.swap(rank, p);
            transform.swap(rank, p);

            let pivot_row = matrix[rank].clone();
            let pivot_ops = transform[rank].clone();
            for i in 0..rows {
                if i != rank && matrix[i][col] {
                    xor_into(&mut matrix[i], &pivot_row);
                    xor_into(&mut transform[i], &pivot_ops);
                }
            }
            pivots.push((rank, col));
            rank += 1;
        }

        Self {
            transform,
            pivots,
            cols,
        }
    }

    /// Solve `M x = e_row`, setting free variables to zero.
    fn solve_unit(&self, row: usize) -> Option<Vec<bool>> {
        let rhs: Vec<bool> = self.transform.iter().map(|ops| ops[row]).collect();
        let rank = self.pivots.len();
        if rhs[rank..].iter().any(|&b| b) {
            return None;
        }
        let mut x = vec![false; self.cols];
        for &(r, c) in &self.pivots {
            x[c] = rhs[r];
        }
        Some(x)
    }
}

fn xor_into(target: &mut [bool], source: &[bool]) {
    for (t, s) in target.iter_mut().zip(source) {
        *t ^= *s;
    }
}
