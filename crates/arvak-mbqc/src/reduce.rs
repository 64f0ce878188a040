//! Boundary reduction ahead of pattern synthesis.
//!
//! A pattern needs a graph state: Z spiders joined only by Hadamard edges.
//! Simplification leaves simple edges between boundaries and the spiders
//! next to them. These are merged away here, with every input and output
//! role moved along so the [`IoMap`] stays exact.

use arvak_ir::Phase;
use arvak_zx::{Diagram, EdgeKind, VertexId};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{MbqcError, MbqcResult};
use crate::io_map::IoMap;

/// Merge the endpoints of every simple edge until none is left.
///
/// Returns the number of vertices removed.
pub fn remove_redundant(
    diagram: &mut Diagram,
    io_map: &mut IoMap<VertexId>,
) -> MbqcResult<usize> {
    let removed = merge_simple_edges(diagram, io_map)?;
    if removed > 0 {
        debug!("Merged {removed} simple edges");
    }
    Ok(removed)
}

/// Remove phase-free degree-two spiders, re-merging any simple edge this
/// creates, until neither rule applies.
///
/// Returns the number of vertices removed.
pub fn identity_cleanup(
    diagram: &mut Diagram,
    io_map: &mut IoMap<VertexId>,
) -> MbqcResult<usize> {
    let mut removed = 0;
    loop {
        let identities = remove_identities(diagram, io_map);
        if identities == 0 {
            break;
        }
        removed += identities + merge_simple_edges(diagram, io_map)?;
    }
    if removed > 0 {
        debug!("Identity cleanup removed {removed} vertices");
    }
    Ok(removed)
}

/// Rewrite every role holder to its rank among the live vertices.
///
/// This is the renumbering [`Diagram::compacted`] applies, so the map stays
/// valid for the compacted diagram. Fails without touching the map if a
/// holder is not a live vertex.
pub fn label_squish(diagram: &Diagram, io_map: &mut IoMap<VertexId>) -> MbqcResult<()> {
    let rank: FxHashMap<VertexId, VertexId> = diagram
        .vertices()
        .into_iter()
        .enumerate()
        .map(|(i, v)| (v, i))
        .collect();
    for (role, _, vertex) in io_map.entries() {
        if !rank.contains_key(&vertex) {
            return Err(MbqcError::InconsistentIoMap { role, vertex });
        }
    }
    io_map.relabel(|v| rank[&v]);
    Ok(())
}

fn merge_simple_edges(diagram: &mut Diagram, io_map: &mut IoMap<VertexId>) -> MbqcResult<usize> {
    let mut merged = 0;
    while let Some((a, b)) = smallest_simple_edge(diagram) {
        merge(diagram, io_map, a, b)?;
        merged += 1;
    }
    Ok(merged)
}

fn smallest_simple_edge(diagram: &Diagram) -> Option<(VertexId, VertexId)> {
    diagram
        .edges()
        .into_iter()
        .find(|&(_, _, kind)| kind == EdgeKind::Simple)
        .map(|(a, b, _)| (a, b))
}

/// Fuse `b` into `a` or `a` into `b` along their simple edge. `a < b`.
fn merge(
    diagram: &mut Diagram,
    io_map: &mut IoMap<VertexId>,
    a: VertexId,
    b: VertexId,
) -> MbqcResult<()> {
    let boundary = |v| io_map.holds(v) || diagram.has_role(v);
    let (keep, gone) = if boundary(a) && !boundary(b) {
        (b, a)
    } else {
        (a, b)
    };

    diagram.remove_edge(a, b, EdgeKind::Simple);
    diagram.add_to_phase(keep, diagram.phase(gone))?;
    diagram.set_qubit(keep, diagram.qubit(gone));
    diagram.set_row(keep, diagram.row(gone));

    for (n, kind) in diagram.incident(gone) {
        if n == keep {
            if kind == EdgeKind::Hadamard {
                diagram.add_to_phase(keep, Phase::pi())?;
            }
            continue;
        }
        rehome(diagram, keep, n, kind);
    }

    diagram.transfer_roles(gone, keep);
    io_map.replace(gone, keep);
    diagram.remove_vertex(gone);
    Ok(())
}

/// Add an edge of `kind`, or cancel it against an existing one.
fn rehome(diagram: &mut Diagram, a: VertexId, b: VertexId, kind: EdgeKind) {
    if !diagram.remove_edge(a, b, kind) {
        diagram.add_edge(a, b, kind);
    }
}

fn remove_identities(diagram: &mut Diagram, io_map: &mut IoMap<VertexId>) -> usize {
    let mut removed = 0;
    while let Some((v, (a, ka), (b, kb))) = next_identity(diagram, io_map) {
        diagram.remove_vertex(v);
        rehome(diagram, a, b, ka.compose(kb));
        removed += 1;
    }
    removed
}

type Incidence = (VertexId, EdgeKind);

fn next_identity(
    diagram: &Diagram,
    io_map: &IoMap<VertexId>,
) -> Option<(VertexId, Incidence, Incidence)> {
    diagram.vertices().into_iter().find_map(|v| {
        if !diagram.is_z(v)
            || !diagram.phase(v).is_zero()
            || diagram.has_role(v)
            || io_map.holds(v)
        {
            return None;
        }
        match diagram.incident(v).as_slice() {
            &[first, second] if first.0 != second.0 => Some((v, first, second)),
            _ => None,
        }
    })
}
