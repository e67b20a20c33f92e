#![deny(missing_docs)]

//! Forman-Ricci and Ollivier-Ricci curvature for weighted graphs.
//!
//! The Forman pass is local: each edge reads only its endpoints and their
//! incident edges. The Ollivier pass first computes all-pairs shortest paths,
//! then solves one optimal transport problem per edge between the lazy random
//! walk measures of its endpoints.

use std::collections::BTreeMap;

use curv_core::EdgeId;

mod config;
mod forman;
mod mass;
mod ollivier;
mod report;
mod shortest_paths;
mod sinkhorn;
mod transport;

/// Curvature value per edge, ordered by edge id.
pub type CurvatureMap = BTreeMap<EdgeId, f64>;

pub use config::{CurvatureConfig, SolverConfig};
pub use forman::{compute_forman, forman_curvature};
pub use mass::neighbor_mass;
pub use ollivier::{compute_ollivier, compute_ollivier_with, ollivier_curvature};
pub use report::{
    format_label, provenance_for, CurvatureReport, EdgeRow, MeasureSummary, DEFAULT_PRECISION,
    REPORT_SCHEMA,
};
pub use shortest_paths::{all_pairs_shortest_paths, DistanceMatrix, NodeIndex};
pub use sinkhorn::SinkhornSolver;
pub use transport::{
    wasserstein_distance, Flow, NetworkFlowSolver, TransportPlan, TransportSolver, MASS_TOLERANCE,
};
