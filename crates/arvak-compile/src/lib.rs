//! Arvak Compilation Framework
//!
//! Pass-based circuit rewriting used by the measurement pattern compiler:
//! rebasing circuits into the gate set ZX diagrams are built from, and
//! placing and routing pattern circuits onto a fixed coupling map.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager | <-- PropertySet (coupling map, basis gates, layout)
//! +-------------+
//!       |
//!       |-- RebaseToZx
//!       |-- TrivialLayout / MappedLayout
//!       `-- SwapRouting  --> FinalLayout
//!       |
//!       v
//! Output Circuit
//! ```
//!
//! # Example
//!
//! ```rust
//! use arvak_compile::{CouplingMap, FinalLayout, PassManagerBuilder};
//! use arvak_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("demo", 3, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(2)).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_rebase()
//!     .with_target(CouplingMap::linear(3))
//!     .build();
//!
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! let compiled = Circuit::from_dag(dag);
//! assert_eq!(compiled.count_ops()["swap"], 1);
//! assert!(props.get::<FinalLayout>().is_some());
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use arvak_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use arvak_ir::CircuitDag;
//!
//! struct CountOps;
//!
//! impl Pass for CountOps {
//!     fn name(&self) -> &str { "count_ops" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(dag.num_ops());
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;

pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use property::{BasisGates, CouplingMap, FinalLayout, Layout, PropertySet};
