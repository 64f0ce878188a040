//! Arvak MBQC
//!
//! Compiles gate circuits into measurement patterns: a graph state is
//! prepared and entangled, every non-output qubit is measured in an adapted
//! basis, and the outputs receive classically controlled Pauli fix-ups.
//!
//! The pipeline runs in stages:
//!
//! - [`MPattern::zx_diagram`]: rebase, draw and simplify the circuit, then
//!   [`reduce`] the boundaries so only Hadamard edges remain
//! - [`partition`]: split the graph into connected components
//! - [`entangle`]: schedule the CZs that build the graph state
//! - [`correct`]: measure along the generalized flow of each component and
//!   propagate byproducts as classical signals
//! - [`segment`] and [`stitch`]: cut large circuits into slices, convert
//!   each one, and join the patterns back together, optionally routed onto
//!   a device
//!
//! # Example
//!
//! ```rust
//! use arvak_ir::{Circuit, QubitId};
//! use arvak_mbqc::{MPattern, Role};
//!
//! let mut circuit = Circuit::with_size("demo", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.t(QubitId(1)).unwrap();
//!
//! let pattern = MPattern::new(circuit).single_conversion().unwrap();
//! assert!(pattern.io_map.get(Role::Output, QubitId(1)).is_some());
//! assert!(pattern.circuit.count_ops().contains_key("measure"));
//! ```

pub mod config;
pub mod correct;
pub mod entangle;
pub mod error;
pub mod io_map;
pub mod partition;
pub mod pattern;
pub mod reduce;
pub mod segment;
pub mod signal;
pub mod stitch;

pub use config::{ArchitectureConfig, ConfigError, MbqcConfig, Topology};
pub use correct::{correct, correct_with_gflow};
pub use entangle::{Schedule, entangle, entangling_circuit, preparation_circuit};
pub use error::{MbqcError, MbqcResult};
pub use io_map::{IoMap, Role};
pub use partition::split_subgraphs;
pub use pattern::{MPattern, Pattern};
pub use reduce::{identity_cleanup, label_squish, remove_redundant};
pub use segment::{Strategy, split};
pub use signal::{Resolved, Signal};
pub use stitch::{stitch, stitch_routed};

use arvak_ir::{ClbitId, QubitId};
use arvak_zx::VertexId;

/// The pattern qubit that carries vertex `v`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn qubit_of(v: VertexId) -> QubitId {
    QubitId(v as u32)
}

/// The bit vertex `v` is measured into.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn clbit_of(v: VertexId) -> ClbitId {
    ClbitId(v as u32)
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn width(n: usize) -> u32 {
    n as u32
}
