use std::fs;
use std::path::Path;

use curv_core::errors::{CurvError, ErrorInfo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::mass::check_idleness;
use crate::sinkhorn::SinkhornSolver;
use crate::transport::{NetworkFlowSolver, TransportSolver};

/// YAML-configurable parameters of a curvature pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvatureConfig {
    /// Fill missing weights with 1 before computing.
    #[serde(default = "default_fix_weights")]
    pub fix_weights: bool,
    /// Probability that the lazy walk stays put (Ollivier only).
    #[serde(default)]
    pub idleness: f64,
    /// Worker threads for the per-edge Ollivier stage; 1 runs inline.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Transport solver used by the Ollivier pass.
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_fix_weights() -> bool {
    true
}

fn default_threads() -> usize {
    1
}

impl Default for CurvatureConfig {
    fn default() -> Self {
        Self {
            fix_weights: default_fix_weights(),
            idleness: 0.0,
            threads: default_threads(),
            solver: SolverConfig::default(),
        }
    }
}

impl CurvatureConfig {
    /// Parses a configuration from YAML text and validates it.
    pub fn from_yaml_str(text: &str) -> Result<Self, CurvError> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|err| CurvError::Config(ErrorInfo::new("parse-yaml", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, CurvError> {
        let text = fs::read_to_string(path).map_err(|err| {
            CurvError::Config(
                ErrorInfo::new("read-config", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), CurvError> {
        check_idleness(self.idleness)?;
        if self.threads == 0 {
            return Err(CurvError::Config(ErrorInfo::new(
                "zero-threads",
                "threads must be at least one",
            )));
        }
        self.solver.validate()
    }

    /// Stable digest of the configuration, recorded in report provenance.
    pub fn fingerprint(&self) -> Result<String, CurvError> {
        let bytes = serde_json::to_vec(self)
            .map_err(|err| CurvError::Serde(ErrorInfo::new("serialize-config", err.to_string())))?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}

/// Transport solver selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SolverConfig {
    /// Exact min-cost flow solver.
    #[default]
    Exact,
    /// Entropy-regularized approximation; results are not exact.
    Sinkhorn {
        /// Entropy regularization ε.
        #[serde(default = "default_regularization")]
        regularization: f64,
        /// Iteration budget before reporting non-convergence.
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
        /// Row-marginal error accepted as converged.
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

fn default_regularization() -> f64 {
    0.05
}

fn default_max_iterations() -> usize {
    1_000
}

fn default_threshold() -> f64 {
    1e-9
}

impl SolverConfig {
    /// Sinkhorn with the given regularization and default iteration limits.
    pub fn sinkhorn(regularization: f64) -> Self {
        SolverConfig::Sinkhorn {
            regularization,
            max_iterations: default_max_iterations(),
            threshold: default_threshold(),
        }
    }

    /// Instantiates the configured solver.
    pub fn build(&self) -> Result<Box<dyn TransportSolver>, CurvError> {
        match self {
            SolverConfig::Exact => Ok(Box::new(NetworkFlowSolver::new())),
            SolverConfig::Sinkhorn {
                regularization,
                max_iterations,
                threshold,
            } => {
                let solver = SinkhornSolver::new(*regularization, *max_iterations)
                    .with_threshold(*threshold);
                solver.validate()?;
                Ok(Box::new(solver))
            }
        }
    }

    fn validate(&self) -> Result<(), CurvError> {
        self.build().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CurvatureConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CurvatureConfig::default());
        assert!(config.fix_weights);
        assert_eq!(config.solver, SolverConfig::Exact);
    }

    #[test]
    fn sinkhorn_fields_default_individually() {
        let config = CurvatureConfig::from_yaml_str(
            "idleness: 0.5\nthreads: 4\nsolver:\n  type: sinkhorn\n  regularization: 0.1\n",
        )
        .unwrap();
        assert_eq!(config.idleness, 0.5);
        assert_eq!(config.threads, 4);
        assert_eq!(
            config.solver,
            SolverConfig::Sinkhorn {
                regularization: 0.1,
                max_iterations: 1_000,
                threshold: 1e-9,
            }
        );
        assert!(!config.solver.build().unwrap().is_exact());
    }

    #[test]
    fn sinkhorn_constructor_matches_yaml_defaults() {
        let parsed = CurvatureConfig::from_yaml_str(
            "solver:\n  type: sinkhorn\n  regularization: 0.2\n",
        )
        .unwrap();
        assert_eq!(parsed.solver, SolverConfig::sinkhorn(0.2));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CurvatureConfig::from_yaml_str("idleness: 1.5").unwrap_err();
        assert_eq!(err.code(), "idleness-range");
        let err = CurvatureConfig::from_yaml_str("threads: 0").unwrap_err();
        assert_eq!(err.code(), "zero-threads");
        let err = CurvatureConfig::from_yaml_str("solver:\n  type: sinkhorn\n  regularization: -1\n")
            .unwrap_err();
        assert_eq!(err.code(), "invalid-solver");
        let err = CurvatureConfig::from_yaml_str("solver: [").unwrap_err();
        assert_eq!(err.code(), "parse-yaml");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let base = CurvatureConfig::default();
        let idle = CurvatureConfig {
            idleness: 0.25,
            ..CurvatureConfig::default()
        };
        assert_eq!(base.fingerprint().unwrap(), base.fingerprint().unwrap());
        assert_ne!(base.fingerprint().unwrap(), idle.fingerprint().unwrap());
    }
}
