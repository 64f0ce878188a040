//! Error types for pattern conversion.

use thiserror::Error;

use crate::config::ConfigError;
use crate::io_map::Role;

/// Errors that can occur while converting a circuit into a pattern.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MbqcError {
    /// A subgraph admits no generalized flow, so no deterministic pattern exists.
    #[error("Subgraph {subgraph} has no generalized flow")]
    UnrealizableGraph { subgraph: usize },

    /// A boundary role points at a vertex that is gone or carries no role.
    #[error("{role} role points at vertex {vertex}, which does not hold it")]
    InconsistentIoMap { role: Role, vertex: usize },

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] arvak_ir::IrError),

    /// Rebasing, placement or routing failed.
    #[error("Compilation error: {0}")]
    Compile(#[from] arvak_compile::CompileError),

    /// Diagram construction failed.
    #[error("Diagram error: {0}")]
    Zx(#[from] arvak_zx::ZxError),

    /// The configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for pattern conversion.
pub type MbqcResult<T> = Result<T, MbqcError>;
