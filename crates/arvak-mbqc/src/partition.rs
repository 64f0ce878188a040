//! Connected-component partitioning.

use std::collections::{BTreeSet, VecDeque};

use arvak_zx::{Diagram, VertexId};
use tracing::debug;

/// Vertex sets of the connected components, ordered by minimum vertex.
pub fn components(diagram: &Diagram) -> Vec<BTreeSet<VertexId>> {
    let mut seen = BTreeSet::new();
    let mut components = Vec::new();

    for start in diagram.vertices() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            for n in diagram.neighbors(v) {
                if seen.insert(n) {
                    component.insert(n);
                    queue.push_back(n);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Split a diagram into one sub-diagram per connected component.
///
/// Vertex identifiers are preserved and each sub-diagram keeps only the
/// input and output roles of its own vertices.
pub fn split_subgraphs(diagram: &Diagram) -> Vec<Diagram> {
    let parts: Vec<Diagram> = components(diagram)
        .iter()
        .map(|keep| diagram.induced(keep))
        .collect();
    debug!("Split diagram into {} subgraphs", parts.len());
    parts
}
