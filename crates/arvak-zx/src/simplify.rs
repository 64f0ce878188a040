//! Rewrite rules for graph-like diagrams.
//!
//! Every rule function applies its rule until it no longer matches and
//! returns the number of applications. Each application removes at least
//! one vertex, so every loop terminates.
//!
//! Pivoting and local complementation only fire on interior spiders:
//! Z spiders without a boundary role whose neighbors are all role-free Z
//! spiders. Boundary wires are therefore left for the caller to absorb.

use std::collections::BTreeSet;

use arvak_ir::Phase;
use tracing::debug;

use crate::diagram::{Diagram, EdgeKind, VertexId, VertexKind};
use crate::error::ZxResult;

/// Turn every X spider into a Z spider and fuse neighboring Z spiders.
///
/// Recoloring a spider toggles the kind of each incident edge. Afterwards
/// no two Z spiders share a simple edge.
pub fn to_graph_like(diagram: &mut Diagram) -> ZxResult<()> {
    let x_spiders: Vec<_> = diagram
        .vertices()
        .into_iter()
        .filter(|&v| diagram.kind(v) == Some(VertexKind::X))
        .collect();

    for v in x_spiders {
        let incident = diagram.incident(v);
        for &(u, kind) in &incident {
            diagram.remove_edge(v, u, kind);
        }
        diagram.set_kind(v, VertexKind::Z);
        for (u, kind) in incident {
            diagram.add_edge(v, u, kind.toggled());
        }
    }

    spider_simp(diagram)?;
    Ok(())
}

/// Fuse Z spiders joined by a simple edge, keeping the lower identifier.
pub fn spider_simp(diagram: &mut Diagram) -> ZxResult<usize> {
    let mut fused = 0;
    while let Some((keep, gone)) = diagram
        .edges()
        .into_iter()
        .find(|&(a, b, kind)| kind == EdgeKind::Simple && diagram.is_z(a) && diagram.is_z(b))
        .map(|(a, b, _)| (a, b))
    {
        fuse(diagram, keep, gone)?;
        fused += 1;
    }
    Ok(fused)
}

fn fuse(diagram: &mut Diagram, keep: VertexId, gone: VertexId) -> ZxResult<()> {
    diagram.add_to_phase(keep, diagram.phase(gone))?;
    for (u, kind) in diagram.incident(gone) {
        if u == keep {
            // The fused simple edge disappears; a parallel Hadamard edge
            // becomes a self-loop.
            if kind == EdgeKind::Hadamard {
                diagram.add_edge_smart(keep, keep, kind)?;
            }
            continue;
        }
        diagram.add_edge_smart(keep, u, kind)?;
    }
    diagram.transfer_roles(gone, keep);
    diagram.remove_vertex(gone);
    Ok(())
}

/// Remove phase-free Z spiders with exactly two neighbors and no role.
pub fn id_simp(diagram: &mut Diagram) -> ZxResult<usize> {
    let mut removed = 0;
    loop {
        let found = diagram
            .vertices()
            .into_iter()
            .find_map(|v| identity_wire(diagram, v).map(|wire| (v, wire)));
        let Some((v, (left, right, kind))) = found else {
            break;
        };

        diagram.remove_vertex(v);
        if diagram.is_z(left) && diagram.is_z(right) {
            diagram.add_edge_smart(left, right, kind)?;
        } else {
            diagram.add_edge(left, right, kind);
        }
        removed += 1;
    }
    Ok(removed)
}

fn identity_wire(diagram: &Diagram, v: VertexId) -> Option<(VertexId, VertexId, EdgeKind)> {
    if !diagram.is_z(v) || !diagram.phase(v).is_zero() || diagram.has_role(v) {
        return None;
    }
    match diagram.incident(v).as_slice() {
        [(left, k1), (right, k2)] if left != right => Some((*left, *right, k1.compose(*k2))),
        _ => None,
    }
}

fn hadamard_only(diagram: &Diagram, v: VertexId) -> bool {
    diagram
        .incident(v)
        .iter()
        .all(|&(_, kind)| kind == EdgeKind::Hadamard)
}

fn pivotable(diagram: &Diagram, v: VertexId) -> bool {
    diagram.is_interior(v) && diagram.phase(v).is_pauli() && hadamard_only(diagram, v)
}

/// Pivot on Hadamard edges between interior Pauli spiders.
pub fn pivot_simp(diagram: &mut Diagram) -> ZxResult<usize> {
    let mut pivots = 0;
    while let Some((u, v)) = diagram
        .edges()
        .into_iter()
        .find(|&(a, b, kind)| {
            kind == EdgeKind::Hadamard && pivotable(diagram, a) && pivotable(diagram, b)
        })
        .map(|(a, b, _)| (a, b))
    {
        pivot(diagram, u, v)?;
        pivots += 1;
    }
    Ok(pivots)
}

fn pivot(diagram: &mut Diagram, u: VertexId, v: VertexId) -> ZxResult<()> {
    let nu: BTreeSet<_> = diagram.neighbors(u).into_iter().filter(|&w| w != v).collect();
    let nv: BTreeSet<_> = diagram.neighbors(v).into_iter().filter(|&w| w != u).collect();
    let only_u: Vec<_> = nu.difference(&nv).copied().collect();
    let only_v: Vec<_> = nv.difference(&nu).copied().collect();
    let shared: Vec<_> = nu.intersection(&nv).copied().collect();

    for (left, right) in [(&only_u, &only_v), (&only_u, &shared), (&only_v, &shared)] {
        for &a in left {
            for &b in right {
                diagram.add_edge_smart(a, b, EdgeKind::Hadamard)?;
            }
        }
    }

    let (pu, pv) = (diagram.phase(u), diagram.phase(v));
    let both = pu.checked_add(pv)?.checked_add(Phase::pi())?;
    for &w in &only_u {
        diagram.add_to_phase(w, pv)?;
    }
    for &w in &only_v {
        diagram.add_to_phase(w, pu)?;
    }
    for &w in &shared {
        diagram.add_to_phase(w, both)?;
    }

    diagram.remove_vertex(u);
    diagram.remove_vertex(v);
    Ok(())
}

/// Locally complement interior spiders with phase ±π/2.
pub fn lcomp_simp(diagram: &mut Diagram) -> ZxResult<usize> {
    let mut applied = 0;
    while let Some(v) = diagram.vertices().into_iter().find(|&v| {
        diagram.is_interior(v)
            && diagram.phase(v).is_proper_clifford()
            && hadamard_only(diagram, v)
    }) {
        let neighbors = diagram.neighbors(v);
        let phase = diagram.phase(v);
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                diagram.add_edge_smart(a, b, EdgeKind::Hadamard)?;
            }
            diagram.add_to_phase(a, -phase)?;
        }
        diagram.remove_vertex(v);
        applied += 1;
    }
    Ok(applied)
}

/// Bring the diagram into graph-like form and remove interior Clifford
/// spiders until no rule applies. Returns the number of rule applications.
pub fn interior_clifford_simp(diagram: &mut Diagram) -> ZxResult<usize> {
    to_graph_like(diagram)?;
    let mut total = 0;
    loop {
        let applied = id_simp(diagram)?
            + spider_simp(diagram)?
            + pivot_simp(diagram)?
            + lcomp_simp(diagram)?;
        if applied == 0 {
            break;
        }
        total += applied;
    }
    debug!(
        "Interior Clifford simplification: {} rewrites, {} vertices left",
        total,
        diagram.num_vertices()
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_ir::{Circuit, QubitId};

    fn simplified(circuit: &Circuit) -> Diagram {
        let mut d = Diagram::from_circuit(circuit).unwrap();
        interior_clifford_simp(&mut d).unwrap();
        d
    }

    #[test]
    fn test_graph_like_recolors_x_spiders() {
        let mut circuit = Circuit::with_size("cx", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut d = Diagram::from_circuit(&circuit).unwrap();
        to_graph_like(&mut d).unwrap();
        assert!(d.vertices().iter().all(|&v| d.kind(v) != Some(VertexKind::X)));
        assert_eq!(d.edge(2, 3), Some(EdgeKind::Hadamard));
        assert_eq!(d.edge(1, 3), Some(EdgeKind::Hadamard));
        assert_eq!(d.edge(3, 5), Some(EdgeKind::Hadamard));
        assert_eq!(d.edge(0, 2), Some(EdgeKind::Simple));
    }

    #[test]
    fn test_double_cnot_cancels() {
        let mut circuit = Circuit::with_size("cxcx", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let d = simplified(&circuit);
        assert!(d.vertices().iter().all(|&v| !d.is_z(v)));
        assert_eq!(
            d.edges(),
            vec![(0, 6, EdgeKind::Simple), (1, 7, EdgeKind::Simple)]
        );
    }

    #[test]
    fn test_fusion_accumulates_phase() {
        let mut circuit = Circuit::with_size("rz", 1, 0);
        circuit.rz(Phase::new(1, 4), QubitId(0)).unwrap();
        circuit.rz(Phase::new(1, 8), QubitId(0)).unwrap();

        let mut d = Diagram::from_circuit(&circuit).unwrap();
        assert_eq!(spider_simp(&mut d).unwrap(), 1);
        assert_eq!(d.phase(1), Phase::new(3, 8));
        assert!(!d.contains(2));
        assert_eq!(d.edge(1, 3), Some(EdgeKind::Simple));
    }

    #[test]
    fn test_fusion_overflow_is_an_error() {
        let mut circuit = Circuit::with_size("primes", 1, 0);
        for p in [1_048_573, 1_048_571, 1_048_559, 1_048_549] {
            circuit.rz(Phase::new(1, p), QubitId(0)).unwrap();
        }

        let mut d = Diagram::from_circuit(&circuit).unwrap();
        let err = interior_clifford_simp(&mut d).unwrap_err();
        assert!(matches!(err, crate::ZxError::Phase(_)));
    }

    #[test]
    fn test_identity_removal_composes_edges() {
        let mut d = Diagram::new();
        let a = d.add_vertex(VertexKind::Z, Phase::new(1, 4));
        let id = d.add_vertex(VertexKind::Z, Phase::zero());
        let b = d.add_vertex(VertexKind::Z, Phase::new(1, 4));
        d.add_edge(a, id, EdgeKind::Hadamard);
        d.add_edge(id, b, EdgeKind::Hadamard);

        assert_eq!(id_simp(&mut d).unwrap(), 1);
        assert_eq!(d.edge(a, b), Some(EdgeKind::Simple));
    }

    #[test]
    fn test_lcomp_complements_neighborhood() {
        let mut d = Diagram::new();
        let centre = d.add_vertex(VertexKind::Z, Phase::new(1, 2));
        let ring: Vec<_> = (0..3)
            .map(|_| d.add_vertex(VertexKind::Z, Phase::new(1, 4)))
            .collect();
        for &r in &ring {
            d.add_edge(centre, r, EdgeKind::Hadamard);
        }
        d.add_edge(ring[0], ring[1], EdgeKind::Hadamard);

        assert_eq!(lcomp_simp(&mut d).unwrap(), 1);
        assert!(!d.contains(centre));
        assert!(!d.connected(ring[0], ring[1]));
        assert!(d.connected(ring[0], ring[2]));
        assert!(d.connected(ring[1], ring[2]));
        for &r in &ring {
            assert_eq!(d.phase(r), Phase::new(7, 4));
        }
    }

    #[test]
    fn test_pivot_removes_pauli_pair() {
        // a - u - v - b with a, b non-Clifford so they survive.
        let mut d = Diagram::new();
        let a = d.add_vertex(VertexKind::Z, Phase::new(1, 4));
        let u = d.add_vertex(VertexKind::Z, Phase::pi());
        let v = d.add_vertex(VertexKind::Z, Phase::zero());
        let b = d.add_vertex(VertexKind::Z, Phase::new(1, 4));
        d.add_edge(a, u, EdgeKind::Hadamard);
        d.add_edge(u, v, EdgeKind::Hadamard);
        d.add_edge(v, b, EdgeKind::Hadamard);

        assert_eq!(pivot_simp(&mut d).unwrap(), 1);
        assert_eq!(d.vertices(), vec![a, b]);
        assert_eq!(d.edge(a, b), Some(EdgeKind::Hadamard));
        assert_eq!(d.phase(a), Phase::new(1, 4));
        assert_eq!(d.phase(b), Phase::new(5, 4));
    }

    #[test]
    fn test_boundaries_survive() {
        let mut circuit = Circuit::with_size("mix", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        circuit.rz(Phase::new(1, 2), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        circuit.rx(Phase::new(1, 4), QubitId(2)).unwrap();

        let d = simplified(&circuit);
        assert_eq!(d.inputs(), [0, 1, 2]);
        assert_eq!(d.outputs().len(), 3);
        for &b in d.inputs().iter().chain(d.outputs()) {
            assert_eq!(d.kind(b), Some(VertexKind::Boundary));
            assert_eq!(d.degree(b), 1);
        }
    }

    #[test]
    fn test_concrete_scenario_shape() {
        let mut circuit = Circuit::with_size("s", 4, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cz(QubitId(3), QubitId(2)).unwrap();
        circuit.h(QubitId(3)).unwrap();
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let d = simplified(&circuit);
        assert_eq!(d.vertices(), vec![0, 1, 2, 3, 4, 5, 6, 8, 9, 10, 11]);
        assert_eq!(d.edge(4, 6), Some(EdgeKind::Hadamard));
        assert_eq!(d.edge(4, 11), Some(EdgeKind::Hadamard));
        assert_eq!(d.edge(0, 6), Some(EdgeKind::Hadamard));
        assert_eq!(d.edge(1, 9), Some(EdgeKind::Simple));
    }
}
