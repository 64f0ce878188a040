//! Layout passes for mapping logical qubits to physical qubits.

use arvak_ir::CircuitDag;
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

/// Trivial layout pass.
///
/// Maps logical qubit i to physical qubit i. Fails when a qubit id does not
/// exist on the device.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let qubits = dag.qubits();
        let available = coupling_map.num_qubits();
        if let Some(max) = qubits.last() {
            if max.0 >= available {
                return Err(CompileError::CircuitTooLarge {
                    required: max.index() + 1,
                    available,
                });
            }
        }

        let mut layout = Layout::new();
        for q in qubits {
            layout.add(q, q.0);
        }
        properties.layout = Some(layout);
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.layout.is_none() && properties.coupling_map.is_some()
    }
}

/// Completes a partially pinned layout.
///
/// Qubits already present in `PropertySet::layout` keep their physical
/// position. Every other circuit qubit, in ascending id order, takes the
/// lowest free physical qubit.
pub struct MappedLayout;

impl Pass for MappedLayout {
    fn name(&self) -> &'static str {
        "MappedLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let available = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?
            .num_qubits();

        let mut layout = properties.layout.take().unwrap_or_default();
        if let Some((logical, physical)) = layout.iter().find(|&(_, p)| p >= available) {
            return Err(CompileError::InvalidConfiguration(format!(
                "{logical} is pinned to physical qubit {physical}, but the device has {available}"
            )));
        }

        let qubits = dag.qubits();
        if qubits.len() > available as usize {
            return Err(CompileError::CircuitTooLarge {
                required: qubits.len(),
                available,
            });
        }

        let mut free = (0..available)
            .filter(|&p| !layout.is_occupied(p))
            .collect::<Vec<_>>()
            .into_iter();
        for q in qubits {
            if layout.get_physical(q).is_some() {
                continue;
            }
            let p = free.next().ok_or(CompileError::CircuitTooLarge {
                required: dag.num_qubits(),
                available,
            })?;
            layout.add(q, p);
        }

        debug!("Mapped {} qubits onto {available} physical qubits", layout.len());
        properties.layout = Some(layout);
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{BasisGates, CouplingMap};
    use arvak_ir::{Circuit, QubitId};

    #[test]
    fn test_trivial_layout() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();

        let mut props = PropertySet::new().with_target(CouplingMap::linear(5), BasisGates::zx());
        TrivialLayout.run(&mut dag, &mut props).unwrap();

        let layout = props.layout.as_ref().unwrap();
        assert_eq!(layout.get_physical(QubitId(0)), Some(0));
        assert_eq!(layout.get_physical(QubitId(2)), Some(2));
    }

    #[test]
    fn test_trivial_layout_too_large() {
        let mut dag = Circuit::with_size("test", 10, 0).into_dag();
        let mut props = PropertySet::new().with_target(CouplingMap::linear(5), BasisGates::zx());

        let result = TrivialLayout.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::CircuitTooLarge { .. })));
    }

    #[test]
    fn test_mapped_layout_keeps_pins() {
        let mut dag = Circuit::with_size("test", 4, 0).into_dag();
        let mut pinned = Layout::new();
        pinned.add(QubitId(2), 0);
        pinned.add(QubitId(0), 3);

        let mut props = PropertySet::new()
            .with_target(CouplingMap::linear(6), BasisGates::zx())
            .with_layout(pinned);
        MappedLayout.run(&mut dag, &mut props).unwrap();

        let layout = props.layout.as_ref().unwrap();
        assert_eq!(layout.get_physical(QubitId(2)), Some(0));
        assert_eq!(layout.get_physical(QubitId(0)), Some(3));
        assert_eq!(layout.get_physical(QubitId(1)), Some(1));
        assert_eq!(layout.get_physical(QubitId(3)), Some(2));
    }

    #[test]
    fn test_mapped_layout_rejects_bad_pin() {
        let mut dag = Circuit::with_size("test", 1, 0).into_dag();
        let mut pinned = Layout::new();
        pinned.add(QubitId(0), 9);

        let mut props = PropertySet::new()
            .with_target(CouplingMap::linear(3), BasisGates::zx())
            .with_layout(pinned);
        let result = MappedLayout.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_mapped_layout_too_large() {
        let mut dag = Circuit::with_size("test", 4, 0).into_dag();
        let mut props = PropertySet::new().with_target(CouplingMap::star(3), BasisGates::zx());
        let result = MappedLayout.run(&mut dag, &mut props);
        assert!(matches!(
            result,
            Err(CompileError::CircuitTooLarge {
                required: 4,
                available: 3
            })
        ));
    }
}
