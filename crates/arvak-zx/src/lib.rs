//! Arvak ZX Diagrams
//!
//! Graph-like ZX diagrams for the measurement pattern compiler:
//!
//! - [`Diagram`]: an undirected graph of Z, X and boundary vertices with
//!   exact phases, simple and Hadamard edges, and ordered inputs/outputs
//! - [`Diagram::from_circuit`]: drawing a circuit over {H, Rz, Rx, CX, CZ}
//! - [`simplify`]: spider fusion, identity removal, pivoting and local
//!   complementation on the diagram interior
//! - [`gflow`](gflow::gflow): generalized flow, giving the measurement order
//!   and correction sets of a pattern
//!
//! # Example
//!
//! ```rust
//! use arvak_ir::{Circuit, Phase, QubitId};
//! use arvak_zx::{Diagram, gflow, simplify};
//!
//! let mut circuit = Circuit::with_size("demo", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//! circuit.rz(Phase::new(1, 4), QubitId(1)).unwrap();
//!
//! let mut diagram = Diagram::from_circuit(&circuit).unwrap();
//! simplify::interior_clifford_simp(&mut diagram).unwrap();
//!
//! assert_eq!(diagram.inputs().len(), 2);
//! let flow = gflow::gflow(&diagram).unwrap();
//! assert_eq!(flow.layer(0).len(), 2);
//! ```

mod builder;
pub mod diagram;
pub mod error;
pub mod gflow;
pub mod simplify;

pub use diagram::{Diagram, EdgeKind, VertexData, VertexId, VertexKind};
pub use error::{ZxError, ZxResult};
pub use gflow::GFlow;
