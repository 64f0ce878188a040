//! Error types for ZX diagram construction.

use arvak_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors that can occur while building or rewriting diagrams.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZxError {
    /// The circuit holds an instruction outside {H, Rz, Rx, CX, CZ, barrier}.
    #[error("Instruction '{0}' has no diagram translation; rebase the circuit first")]
    UnsupportedGate(String),

    /// An instruction acts on a qubit the circuit does not declare.
    #[error("Qubit {0} is not part of the circuit")]
    QubitNotFound(QubitId),

    /// Exact phase arithmetic failed during a rewrite.
    #[error("Phase error: {0}")]
    Phase(#[from] IrError),
}

/// Result type for diagram operations.
pub type ZxResult<T> = Result<T, ZxError>;
