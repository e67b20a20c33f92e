use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::{CurvatureKind, EdgeId, WeightedGraph};
use curv_graph::{normalize_weights, validate_weights, GraphImpl};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::CurvatureConfig;
use crate::forman::weight_of;
use crate::mass::{check_idleness, neighbor_mass};
use crate::shortest_paths::{all_pairs_shortest_paths, DistanceMatrix, NodeIndex};
use crate::transport::TransportSolver;
use crate::CurvatureMap;

/// Computes the Ollivier-Ricci curvature of every edge.
///
/// `κ(e) = 1 − W1(μ_v1, μ_v2) / w_e`, where `μ_v` is the lazy random walk
/// measure of [`neighbor_mass`] and `W1` is solved over the all-pairs
/// shortest-path metric with the solver named in `config`. An edge whose
/// measures cannot be coupled at finite cost gets `-inf`.
pub fn ollivier_curvature<G>(graph: &G, config: &CurvatureConfig) -> Result<CurvatureMap, CurvError>
where
    G: WeightedGraph + ?Sized,
{
    check_idleness(config.idleness)?;
    validate_weights(graph)?;
    let (index, distances) = all_pairs_shortest_paths(graph)?;
    let solver = config.solver.build()?;
    let edges: Vec<EdgeId> = graph.edges().collect();

    let job = EdgeJob {
        graph,
        index: &index,
        distances: &distances,
        solver: solver.as_ref(),
        idleness: config.idleness,
    };

    let values: Vec<(EdgeId, f64)> = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|err| {
                CurvError::Config(
                    ErrorInfo::new("thread-pool", err.to_string())
                        .with_context("threads", config.threads.to_string()),
                )
            })?;
        pool.install(|| {
            edges
                .par_iter()
                .map(|&edge| job.run(edge).map(|value| (edge, value)))
                .collect::<Result<Vec<_>, CurvError>>()
        })?
    } else {
        edges
            .iter()
            .map(|&edge| job.run(edge).map(|value| (edge, value)))
            .collect::<Result<Vec<_>, CurvError>>()?
    };

    let unreachable = values.iter().filter(|(_, value)| !value.is_finite()).count();
    if unreachable > 0 {
        warn!(unreachable, "edges without a finite transport plan");
    }
    Ok(values.into_iter().collect())
}

/// Computes Ollivier curvature with the exact solver on a single thread.
pub fn compute_ollivier(
    graph: &mut GraphImpl,
    idleness: f64,
    fix: bool,
) -> Result<CurvatureMap, CurvError> {
    let config = CurvatureConfig {
        fix_weights: fix,
        idleness,
        ..CurvatureConfig::default()
    };
    compute_ollivier_with(graph, &config)
}

/// Fills missing weights (when configured), then writes `ollivier` on every edge.
pub fn compute_ollivier_with(
    graph: &mut GraphImpl,
    config: &CurvatureConfig,
) -> Result<CurvatureMap, CurvError> {
    config.validate()?;
    normalize_weights(graph, config.fix_weights)?;
    let values = ollivier_curvature(graph, config)?;
    graph.apply_curvature(CurvatureKind::Ollivier, &values)?;
    info!(
        edges = values.len(),
        idleness = config.idleness,
        threads = config.threads,
        "ollivier curvature pass complete"
    );
    Ok(values)
}

struct EdgeJob<'a, G: ?Sized> {
    graph: &'a G,
    index: &'a NodeIndex,
    distances: &'a DistanceMatrix,
    solver: &'a dyn TransportSolver,
    idleness: f64,
}

impl<G> EdgeJob<'_, G>
where
    G: WeightedGraph + ?Sized,
{
    fn run(&self, edge: EdgeId) -> Result<f64, CurvError> {
        let (v1, v2) = self.graph.endpoints(edge)?;
        let weight = weight_of(self.graph.edge_weight(edge)?, "edge", edge.as_raw())?;
        let source = neighbor_mass(self.graph, self.index, v1, self.idleness)?;
        let target = neighbor_mass(self.graph, self.index, v2, self.idleness)?;
        let plan = self
            .solver
            .solve(&source, &target, self.distances)
            .map_err(|err| with_edge(err, edge))?;
        debug!(
            edge = edge.as_raw(),
            cost = plan.cost,
            iterations = plan.iterations,
            "edge transport solved"
        );
        Ok(1.0 - plan.cost / weight)
    }
}

fn with_edge(err: CurvError, edge: EdgeId) -> CurvError {
    match err {
        CurvError::Transport(info) => {
            CurvError::Transport(info.with_context("edge", edge.as_raw().to_string()))
        }
        other => other,
    }
}
