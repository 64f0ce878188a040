//! The conversion driver.

use arvak_compile::{CouplingMap, PassManagerBuilder};
use arvak_ir::{Circuit, QubitId};
use arvak_zx::simplify::interior_clifford_simp;
use arvak_zx::{Diagram, VertexId};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::MbqcConfig;
use crate::correct::correct_with_gflow;
use crate::entangle::{entangling_circuit, preparation_circuit};
use crate::error::MbqcResult;
use crate::io_map::IoMap;
use crate::partition::split_subgraphs;
use crate::qubit_of;
use crate::reduce::{identity_cleanup, label_squish, remove_redundant};
use crate::segment::{Strategy, split};
use crate::stitch::{stitch, stitch_routed};

/// A measurement pattern and where each circuit qubit enters and leaves it.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Preparation, entangling, measurement and correction, in order.
    pub circuit: Circuit,
    /// Input and output qubit of every original circuit qubit.
    pub io_map: IoMap<QubitId>,
}

impl Pattern {
    /// A pattern with no qubits.
    pub fn empty() -> Self {
        Self {
            circuit: Circuit::new("pattern"),
            io_map: IoMap::new(),
        }
    }
}

/// Converts a gate circuit into measurement patterns.
#[derive(Debug, Clone)]
pub struct MPattern {
    circuit: Circuit,
    parallel: bool,
}

impl MPattern {
    /// Wrap a circuit for conversion.
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            parallel: false,
        }
    }

    /// Convert segments on the rayon thread pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The circuit being converted.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Rebase, simplify and reduce the circuit to a graph state.
    ///
    /// The returned diagram is compacted, so its vertices are `0..n`, and the
    /// map records which vertex holds each qubit's input and output role.
    pub fn zx_diagram(&self) -> MbqcResult<(Diagram, IoMap<VertexId>)> {
        let (pm, mut props) = PassManagerBuilder::new().with_rebase().build();
        let mut dag = self.circuit.clone().into_dag();
        pm.run(&mut dag, &mut props)?;
        let rebased = Circuit::from_dag(dag);

        let mut diagram = Diagram::from_circuit(&rebased)?;
        let rewrites = interior_clifford_simp(&mut diagram)?;
        let mut io_map = IoMap::from_diagram(&diagram, rebased.qubits());

        remove_redundant(&mut diagram, &mut io_map)?;
        identity_cleanup(&mut diagram, &mut io_map)?;
        io_map.check(&diagram)?;

        label_squish(&diagram, &mut io_map)?;
        let diagram = diagram.compacted();
        debug!(
            "Reduced to {} vertices and {} edges after {} rewrites",
            diagram.num_vertices(),
            diagram.num_edges(),
            rewrites
        );
        Ok((diagram, io_map))
    }

    /// Convert the whole circuit into one pattern.
    #[instrument(skip(self), fields(circuit = %self.circuit.name()))]
    pub fn single_conversion(&self) -> MbqcResult<Pattern> {
        let (diagram, io_map) = self.zx_diagram()?;
        let subgraphs = split_subgraphs(&diagram);

        let mut circuit = preparation_circuit(&diagram)?;
        circuit.append(&entangling_circuit(&diagram)?)?;
        circuit.append(&correct_with_gflow(&subgraphs)?)?;

        info!(
            "Converted {} ops into a pattern on {} qubits with {} bits",
            self.circuit.num_ops(),
            circuit.num_qubits(),
            circuit.num_clbits()
        );
        Ok(Pattern {
            circuit: circuit.with_name(self.circuit.name()),
            io_map: io_map.map(qubit_of),
        })
    }

    /// Split the circuit into at most `n` slices and convert each one.
    pub fn multi_conversion(&self, n: usize, strategy: Strategy) -> MbqcResult<Vec<Pattern>> {
        self.convert_slices(n, strategy, self.parallel)
    }

    fn convert_slices(
        &self,
        n: usize,
        strategy: Strategy,
        parallel: bool,
    ) -> MbqcResult<Vec<Pattern>> {
        let slices = split(&self.circuit, n, strategy)?;
        debug!("Converting {} segments", slices.len());
        let convert = |slice: &Circuit| MPattern::new(slice.clone()).single_conversion();
        if parallel {
            slices.par_iter().map(convert).collect()
        } else {
            slices.iter().map(convert).collect()
        }
    }

    /// Segment, convert and stitch on logical qubits.
    #[instrument(skip(self))]
    pub fn unrouted_conversion(&self, n: usize, strategy: Strategy) -> MbqcResult<Pattern> {
        let segments = self.multi_conversion(n, strategy)?;
        let pattern = stitch(&segments)?;
        info!(
            "Stitched {} segments into {} qubits",
            segments.len(),
            pattern.circuit.num_qubits()
        );
        Ok(pattern)
    }

    /// Segment, convert and stitch onto the qubits of `coupling_map`.
    #[instrument(skip(self, coupling_map))]
    pub fn routed_conversion(
        &self,
        coupling_map: &CouplingMap,
        n: usize,
        strategy: Strategy,
    ) -> MbqcResult<Pattern> {
        let segments = self.multi_conversion(n, strategy)?;
        let pattern = stitch_routed(&segments, coupling_map)?;
        info!(
            "Routed {} segments onto {} physical qubits",
            segments.len(),
            coupling_map.num_qubits()
        );
        Ok(pattern)
    }

    /// Convert according to `config`.
    #[instrument(skip(self, config))]
    pub fn convert(&self, config: &MbqcConfig) -> MbqcResult<Pattern> {
        config.validate()?;
        let segments = self.convert_slices(config.segments, config.strategy, config.parallel)?;
        match &config.architecture {
            Some(arch) => stitch_routed(&segments, &arch.coupling_map()?),
            None => stitch(&segments),
        }
    }
}
