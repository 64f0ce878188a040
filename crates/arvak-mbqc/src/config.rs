//! Conversion settings.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with ARVAK_MBQC_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::path::Path;

use arvak_compile::CouplingMap;
use serde::{Deserialize, Serialize};

use crate::segment::Strategy;

/// Complete conversion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbqcConfig {
    /// Maximum number of segments the circuit is cut into
    #[serde(default = "default_segments")]
    pub segments: usize,

    /// How segment boundaries are chosen
    #[serde(default)]
    pub strategy: Strategy,

    /// Convert segments on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,

    /// Target device; patterns stay on logical qubits without one
    #[serde(default)]
    pub architecture: Option<ArchitectureConfig>,
}

/// Device connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    /// Connectivity shape
    pub topology: Topology,

    /// Number of physical qubits (all shapes except grid)
    #[serde(default)]
    pub qubits: u32,

    /// Grid rows
    #[serde(default)]
    pub rows: Option<u32>,

    /// Grid columns
    #[serde(default)]
    pub columns: Option<u32>,
}

/// Supported connectivity shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Linear,
    Ring,
    Grid,
    Star,
    Full,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Linear => "linear",
            Topology::Ring => "ring",
            Topology::Grid => "grid",
            Topology::Star => "star",
            Topology::Full => "full",
        };
        write!(f, "{name}")
    }
}

fn default_segments() -> usize {
    1
}

impl Default for MbqcConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            strategy: Strategy::default(),
            parallel: false,
            architecture: None,
        }
    }
}

impl MbqcConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: MbqcConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load configuration with the full precedence chain.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            MbqcConfig::default()
        };

        config = config.merge_env();

        config.validate()?;
        Ok(config)
    }

    /// Apply `ARVAK_MBQC_*` environment overrides.
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("ARVAK_MBQC_SEGMENTS") {
            if let Ok(val) = v.parse() {
                self.segments = val;
            }
        }
        if let Some(v) = var("ARVAK_MBQC_STRATEGY") {
            if let Ok(val) = v.parse() {
                self.strategy = val;
            }
        }
        if let Some(v) = var("ARVAK_MBQC_PARALLEL") {
            if let Ok(val) = v.parse() {
                self.parallel = val;
            }
        }
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments == 0 {
            return Err(ConfigError::Validation(
                "segments must be at least 1".to_string(),
            ));
        }
        if let Some(arch) = &self.architecture {
            arch.validate()?;
        }
        Ok(())
    }
}

impl ArchitectureConfig {
    /// Check that the shape has a size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.topology {
            Topology::Grid => match (self.rows, self.columns) {
                (Some(r), Some(c)) if r > 0 && c > 0 => Ok(()),
                _ => Err(ConfigError::Validation(
                    "grid topology needs positive rows and columns".to_string(),
                )),
            },
            other if self.qubits == 0 => Err(ConfigError::Validation(format!(
                "{other} topology needs at least one qubit"
            ))),
            _ => Ok(()),
        }
    }

    /// Build the coupling map this architecture describes.
    pub fn coupling_map(&self) -> Result<CouplingMap, ConfigError> {
        self.validate()?;
        Ok(match self.topology {
            Topology::Linear => CouplingMap::linear(self.qubits),
            Topology::Ring => CouplingMap::ring(self.qubits),
            Topology::Star => CouplingMap::star(self.qubits),
            Topology::Full => CouplingMap::full(self.qubits),
            Topology::Grid => {
                CouplingMap::grid(self.rows.unwrap_or(0), self.columns.unwrap_or(0))
            }
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MbqcConfig::default();
        assert_eq!(config.segments, 1);
        assert_eq!(config.strategy, Strategy::Depth);
        assert!(!config.parallel);
        assert!(config.architecture.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let config = MbqcConfig::from_yaml(
            "segments: 3\nstrategy: gates\narchitecture:\n  topology: grid\n  rows: 2\n  columns: 3\n",
        )
        .unwrap();
        assert_eq!(config.segments, 3);
        assert_eq!(config.strategy, Strategy::Gates);
        let map = config.architecture.unwrap().coupling_map().unwrap();
        assert_eq!(map.num_qubits(), 6);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = MbqcConfig::from_yaml("{}").unwrap();
        assert_eq!(config, MbqcConfig::default());
    }

    #[test]
    fn test_validate_zero_segments() {
        let config = MbqcConfig {
            segments: 0,
            ..MbqcConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_sizeless_topology() {
        let arch = ArchitectureConfig {
            topology: Topology::Ring,
            qubits: 0,
            rows: None,
            columns: None,
        };
        assert!(arch.validate().is_err());
        assert!(arch.coupling_map().is_err());

        let grid = ArchitectureConfig {
            topology: Topology::Grid,
            qubits: 0,
            rows: Some(2),
            columns: None,
        };
        assert!(grid.validate().is_err());
    }

    #[test]
    fn test_unknown_topology_fails_to_parse() {
        let err = MbqcConfig::from_yaml("architecture:\n  topology: torus\n  qubits: 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars = |key: &str| match key {
            "ARVAK_MBQC_SEGMENTS" => Some("4".to_string()),
            "ARVAK_MBQC_STRATEGY" => Some("gates".to_string()),
            "ARVAK_MBQC_PARALLEL" => Some("not-a-bool".to_string()),
            _ => None,
        };
        let config = MbqcConfig::default().merge_vars(vars);
        assert_eq!(config.segments, 4);
        assert_eq!(config.strategy, Strategy::Gates);
        assert!(!config.parallel);
    }

    #[test]
    fn test_missing_file() {
        let err = MbqcConfig::from_file("/nonexistent/mbqc.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
