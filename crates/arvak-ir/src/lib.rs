//! Arvak Circuit Intermediate Representation
//!
//! This crate provides the circuit data structures shared by the measurement
//! pattern compiler: the input circuits handed to it and the pattern circuits
//! it produces.
//!
//! # Overview
//!
//! The circuit IR uses a DAG (Directed Acyclic Graph) representation internally.
//! The high-level [`Circuit`] API provides a builder for constructing circuits,
//! including the classical feed-forward operations pattern circuits need:
//! measurements, resets, barriers over qubits and bits, classically
//! conditioned gates and classical parities.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Phases**: [`Phase`], an exact rational multiple of π
//! - **Gates**: [`StandardGate`] and [`Gate`] with an optional [`ClassicalCondition`]
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] with as-soon-as-possible layering
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example
//!
//! ```rust
//! use arvak_ir::{Circuit, ClassicalCondition, ClbitId, Phase, QubitId, StandardGate};
//!
//! let mut circuit = Circuit::with_size("teleport_step", 2, 1);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//! circuit.rz(Phase::new(1, 4), QubitId(0)).unwrap();
//! circuit.measure(QubitId(0), ClbitId(0)).unwrap();
//! circuit
//!     .conditional(StandardGate::X, [QubitId(1)], ClassicalCondition::is_set(ClbitId(0)))
//!     .unwrap();
//!
//! assert_eq!(circuit.depth(), 5);
//! assert_eq!(circuit.layers().len(), 5);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Clifford |
//! |------|--------|----------|
//! | `I`, `X`, `Y`, `Z`, `H`, `S`, `Sdg`, `SX`, `SXdg` | 1 | yes |
//! | `T`, `Tdg` | 1 | no |
//! | `Rx`, `Ry`, `Rz` | 1 | at multiples of π/2 |
//! | `CX`, `CY`, `CZ`, `Swap` | 2 | yes |
//! | `CH` | 2 | no |
//! | `CRx`, `CRy`, `CRz` | 2 | at multiples of π |
//! | `CCX`, `CSwap` | 3 | no |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod phase;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use phase::Phase;
pub use qubit::{ClbitId, QubitId};
