//! Splitting circuits into consecutive slices.

use std::fmt;
use std::str::FromStr;

use arvak_ir::{Circuit, Instruction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MbqcResult;

/// How slice boundaries are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Equal numbers of layers per slice.
    #[default]
    Depth,
    /// Roughly equal numbers of non-Clifford gates per slice.
    Gates,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Depth => write!(f, "depth"),
            Strategy::Gates => write!(f, "gates"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "depth" => Ok(Strategy::Depth),
            "gates" => Ok(Strategy::Gates),
            other => Err(format!("unknown segmentation strategy '{other}'")),
        }
    }
}

fn non_clifford(layer: &[Instruction]) -> usize {
    layer
        .iter()
        .filter(|inst| inst.as_gate().is_some_and(|g| !g.kind.is_clifford()))
        .count()
}

/// Split `circuit` into at most `n` slices of consecutive layers.
///
/// Every slice keeps the full qubit and bit set of the circuit. A circuit
/// without operations yields one empty slice.
pub fn split(circuit: &Circuit, n: usize, strategy: Strategy) -> MbqcResult<Vec<Circuit>> {
    let n = n.max(1);
    let layers = circuit.layers();
    if layers.is_empty() {
        return Ok(vec![circuit.sliced(&[])?]);
    }

    let groups: Vec<&[Vec<Instruction>]> = match strategy {
        Strategy::Depth => layers.chunks(layers.len().div_ceil(n)).collect(),
        Strategy::Gates => by_gates(&layers, n),
    };
    if groups.len() < n {
        debug!(
            "Requested {n} slices, {strategy} strategy produced {}",
            groups.len()
        );
    }

    groups.into_iter().map(|g| Ok(circuit.sliced(g)?)).collect()
}

/// Close a slice once it holds `ceil(total / n)` non-Clifford gates, just
/// before the next layer that has any.
fn by_gates(layers: &[Vec<Instruction>], n: usize) -> Vec<&[Vec<Instruction>]> {
    let counts: Vec<usize> = layers.iter().map(|l| non_clifford(l)).collect();
    let threshold = counts.iter().sum::<usize>().div_ceil(n);

    let mut groups = Vec::new();
    let mut start = 0;
    let mut held = 0;
    for (i, &count) in counts.iter().enumerate() {
        if threshold > 0 && held >= threshold && count > 0 && groups.len() + 1 < n {
            groups.push(&layers[start..i]);
            start = i;
            held = 0;
        }
        held += count;
    }
    groups.push(&layers[start..]);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_ir::QubitId;

    fn layered(circuit: &Circuit) -> Vec<Vec<String>> {
        circuit
            .layers()
            .iter()
            .map(|l| l.iter().map(|i| i.name().to_string()).collect())
            .collect()
    }

    fn t_chain(len: usize) -> Circuit {
        let mut circuit = Circuit::with_size("chain", 1, 0);
        for _ in 0..len {
            circuit.t(QubitId(0)).unwrap();
        }
        circuit
    }

    #[test]
    fn test_depth_chunks() {
        let slices = split(&t_chain(7), 3, Strategy::Depth).unwrap();
        let sizes: Vec<_> = slices.iter().map(Circuit::num_ops).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_depth_keeps_wires() {
        let mut circuit = Circuit::with_size("wide", 3, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        let slices = split(&circuit, 2, Strategy::Depth).unwrap();
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.num_qubits() == 3 && s.num_clbits() == 1));
    }

    #[test]
    fn test_empty_circuit_gives_one_slice() {
        let circuit = Circuit::with_size("empty", 2, 0);
        let slices = split(&circuit, 4, Strategy::Gates).unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].num_ops(), 0);
        assert_eq!(slices[0].num_qubits(), 2);
    }

    #[test]
    fn test_gates_absorb_clifford_tail() {
        let mut circuit = Circuit::with_size("mix", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.t(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let slices = split(&circuit, 2, Strategy::Gates).unwrap();
        assert_eq!(layered(&slices[0]), vec![vec!["t"], vec!["h"], vec!["h"]]);
        assert_eq!(layered(&slices[1]), vec![vec!["t"], vec!["h"]]);
    }

    #[test]
    fn test_all_clifford_is_one_slice() {
        let mut circuit = Circuit::with_size("cliff", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let slices = split(&circuit, 3, Strategy::Gates).unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].num_ops(), 2);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Gates".parse::<Strategy>(), Ok(Strategy::Gates));
        assert_eq!("depth".parse::<Strategy>(), Ok(Strategy::Depth));
        assert!("width".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Gates.to_string(), "gates");
    }
}
