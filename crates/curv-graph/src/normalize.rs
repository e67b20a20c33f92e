use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::{WeightedGraph, DEFAULT_WEIGHT};
use tracing::debug;

/// Counts of weights written by a normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOutcome {
    /// Vertices that received the default weight.
    pub filled_nodes: usize,
    /// Edges that received the default weight.
    pub filled_edges: usize,
}

impl NormalizeOutcome {
    /// Returns true when the pass wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.filled_nodes == 0 && self.filled_edges == 0
    }
}

/// Gives every vertex and edge without a weight the default weight of 1.
///
/// Existing weights are never overwritten, so running the pass again is a
/// no-op. With `fix == false` the caller asserts that all weights are already
/// present and nothing is touched.
pub fn normalize_weights<G>(graph: &mut G, fix: bool) -> Result<NormalizeOutcome, CurvError>
where
    G: WeightedGraph + ?Sized,
{
    let mut outcome = NormalizeOutcome::default();
    if !fix {
        return Ok(outcome);
    }
    let edges: Vec<_> = graph.edges().collect();
    for edge in edges {
        if graph.fill_edge_weight(edge, DEFAULT_WEIGHT)? {
            outcome.filled_edges += 1;
        }
    }
    let nodes: Vec<_> = graph.nodes().collect();
    for node in nodes {
        if graph.fill_node_weight(node, DEFAULT_WEIGHT)? {
            outcome.filled_nodes += 1;
        }
    }
    debug!(
        filled_nodes = outcome.filled_nodes,
        filled_edges = outcome.filled_edges,
        "normalized graph weights"
    );
    Ok(outcome)
}

/// Checks that every vertex and edge carries a finite, strictly positive weight.
pub fn validate_weights<G>(graph: &G) -> Result<(), CurvError>
where
    G: WeightedGraph + ?Sized,
{
    for node in graph.nodes() {
        let weight = graph.node_weight(node)?;
        check_weight(weight, "node", node.as_raw())?;
    }
    for edge in graph.edges() {
        let weight = graph.edge_weight(edge)?;
        check_weight(weight, "edge", edge.as_raw())?;
    }
    Ok(())
}

fn check_weight(weight: Option<f64>, kind: &str, raw: u64) -> Result<(), CurvError> {
    match weight {
        None => Err(CurvError::Weight(
            ErrorInfo::new("missing-weight", format!("{kind} has no weight"))
                .with_context(kind, raw.to_string())
                .with_hint("run the pass with fix enabled or set the weight explicitly"),
        )),
        Some(value) if !(value.is_finite() && value > 0.0) => Err(CurvError::Weight(
            ErrorInfo::new(
                "non-positive-weight",
                format!("{kind} weight must be finite and strictly positive"),
            )
            .with_context(kind, raw.to_string())
            .with_context("weight", value.to_string()),
        )),
        Some(_) => Ok(()),
    }
}
