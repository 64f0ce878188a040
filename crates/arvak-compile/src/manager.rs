//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use arvak_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{MappedLayout, RebaseToZx, SwapRouting, TrivialLayout};
use crate::property::{BasisGates, CouplingMap, Layout, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!("Pass manager completed, ops: {}", dag.num_ops());
        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
///
/// Passes are added in a fixed order: rebase, layout, routing.
pub struct PassManagerBuilder {
    rebase: bool,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with no passes selected.
    pub fn new() -> Self {
        Self {
            rebase: false,
            properties: PropertySet::new(),
        }
    }

    /// Rebase into the ZX gate set.
    #[must_use]
    pub fn with_rebase(mut self) -> Self {
        self.rebase = true;
        self.properties.basis_gates = Some(BasisGates::zx());
        self
    }

    /// Place and route onto `coupling_map`.
    #[must_use]
    pub fn with_target(mut self, coupling_map: CouplingMap) -> Self {
        self.properties.coupling_map = Some(coupling_map);
        self
    }

    /// Pin some logical qubits to physical positions before placement.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.properties.layout = Some(layout);
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.rebase {
            pm.add_pass(RebaseToZx);
        }

        if self.properties.coupling_map.is_some() {
            if self.properties.layout.is_some() {
                pm.add_pass(MappedLayout);
            } else {
                pm.add_pass(TrivialLayout);
            }
            pm.add_pass(SwapRouting);
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
