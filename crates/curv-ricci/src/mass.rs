use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::{NodeId, WeightedGraph};

use crate::shortest_paths::NodeIndex;

/// Lazy random walk distribution of a vertex over every indexed vertex.
///
/// Mass `idleness` stays on `node`; the remaining `1 - idleness` is spread
/// uniformly over its neighbours. Vertices without neighbours have no such
/// distribution and yield `isolated-vertex`.
pub fn neighbor_mass<G>(
    graph: &G,
    index: &NodeIndex,
    node: NodeId,
    idleness: f64,
) -> Result<Vec<f64>, CurvError>
where
    G: WeightedGraph + ?Sized,
{
    check_idleness(idleness)?;
    let neighbors = graph.neighbors(node)?;
    if neighbors.is_empty() {
        return Err(CurvError::Graph(
            ErrorInfo::new("isolated-vertex", "vertex has no neighbours to spread mass over")
                .with_context("node", node.as_raw().to_string()),
        ));
    }
    let spread = (1.0 - idleness) / neighbors.len() as f64;
    let mut mass = vec![0.0; index.len()];
    for neighbor in neighbors {
        mass[index.position(neighbor.node)?] = spread;
    }
    mass[index.position(node)?] = idleness;
    Ok(mass)
}

pub(crate) fn check_idleness(idleness: f64) -> Result<(), CurvError> {
    if (0.0..=1.0).contains(&idleness) {
        return Ok(());
    }
    Err(CurvError::Config(
        ErrorInfo::new("idleness-range", "idleness must lie in [0, 1]")
            .with_context("idleness", idleness.to_string()),
    ))
}
