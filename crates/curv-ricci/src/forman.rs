use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::{CurvatureKind, EdgeId, NodeId, WeightedGraph};
use curv_graph::{normalize_weights, validate_weights, GraphImpl};
use tracing::info;

use crate::CurvatureMap;

/// Computes the Forman-Ricci curvature of every edge.
///
/// For `e = (v1, v2)`:
///
/// ```text
/// F(e) = w_e · ( w_v1/w_e + w_v2/w_e
///              − Σ_{n ~ v1, n ≠ v2} w_v1 / √(w_e · w(v1, n))
///              − Σ_{n ~ v2, n ≠ v1} w_v2 / √(w_e · w(v2, n)) )
/// ```
///
/// Only the two endpoints and their incident edges are read. Every weight
/// must be present and strictly positive.
pub fn forman_curvature<G>(graph: &G) -> Result<CurvatureMap, CurvError>
where
    G: WeightedGraph + ?Sized,
{
    validate_weights(graph)?;
    let mut values = CurvatureMap::new();
    for edge in graph.edges() {
        values.insert(edge, forman_edge(graph, edge)?);
    }
    Ok(values)
}

/// Fills missing weights (when `fix`), then writes `forman` on every edge.
///
/// Returns the values that were written.
pub fn compute_forman(graph: &mut GraphImpl, fix: bool) -> Result<CurvatureMap, CurvError> {
    normalize_weights(graph, fix)?;
    let values = forman_curvature(graph)?;
    graph.apply_curvature(CurvatureKind::Forman, &values)?;
    info!(edges = values.len(), "forman curvature pass complete");
    Ok(values)
}

fn forman_edge<G>(graph: &G, edge: EdgeId) -> Result<f64, CurvError>
where
    G: WeightedGraph + ?Sized,
{
    let (v1, v2) = graph.endpoints(edge)?;
    let we = weight_of(graph.edge_weight(edge)?, "edge", edge.as_raw())?;
    let wv1 = weight_of(graph.node_weight(v1)?, "node", v1.as_raw())?;
    let wv2 = weight_of(graph.node_weight(v2)?, "node", v2.as_raw())?;

    let mut penalties = Vec::new();
    collect_penalties(graph, v1, v2, wv1, we, &mut penalties)?;
    collect_penalties(graph, v2, v1, wv2, we, &mut penalties)?;
    // Summing in a fixed order keeps the value independent of adjacency order.
    penalties.sort_by(f64::total_cmp);
    let penalty: f64 = penalties.iter().sum();

    Ok(we * ((wv1 + wv2) / we - penalty))
}

fn collect_penalties<G>(
    graph: &G,
    vertex: NodeId,
    other: NodeId,
    vertex_weight: f64,
    edge_weight: f64,
    out: &mut Vec<f64>,
) -> Result<(), CurvError>
where
    G: WeightedGraph + ?Sized,
{
    for neighbor in graph.neighbors(vertex)? {
        if neighbor.node == other {
            continue;
        }
        let w = weight_of(graph.edge_weight(neighbor.edge)?, "edge", neighbor.edge.as_raw())?;
        out.push(vertex_weight / (edge_weight * w).sqrt());
    }
    Ok(())
}

pub(crate) fn weight_of(weight: Option<f64>, kind: &str, raw: u64) -> Result<f64, CurvError> {
    weight.ok_or_else(|| {
        CurvError::Weight(
            ErrorInfo::new("missing-weight", format!("{kind} has no weight"))
                .with_context(kind, raw.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curv_graph::{complete_graph, path_graph, star_graph};

    fn forman_values(mut graph: GraphImpl) -> Vec<f64> {
        compute_forman(&mut graph, true)
            .unwrap()
            .into_values()
            .collect()
    }

    #[test]
    fn path_of_three_has_unit_curvature() {
        // (1 + 1) − 1/√1 on each edge
        assert_eq!(forman_values(path_graph(3).unwrap()), vec![1.0, 1.0]);
    }

    #[test]
    fn unit_weights_match_degree_formula() {
        // 4 − deg(v1) − deg(v2) for unit weights
        for value in forman_values(complete_graph(4).unwrap()) {
            assert_eq!(value, -2.0);
        }
        for value in forman_values(star_graph(4).unwrap()) {
            assert_eq!(value, -1.0);
        }
        assert_eq!(forman_values(complete_graph(3).unwrap()), vec![0.0; 3]);
    }

    #[test]
    fn weights_enter_the_formula() {
        let mut graph = GraphImpl::new();
        let a = graph.add_node(Some(2.0));
        let b = graph.add_node(Some(1.0));
        let c = graph.add_node(Some(1.0));
        let ab = graph.add_edge(a, b, Some(4.0)).unwrap();
        graph.add_edge(b, c, Some(1.0)).unwrap();
        let values = compute_forman(&mut graph, true).unwrap();
        // 4 · ((2 + 1)/4 − 1/√(4·1)) = 3 − 2
        assert!((values[&ab] - 1.0).abs() < 1e-12);
        assert_eq!(graph.forman(ab).unwrap(), Some(values[&ab]));
    }

    #[test]
    fn unfixed_graph_without_weights_fails() {
        let mut graph = path_graph(3).unwrap();
        let err = compute_forman(&mut graph, false).unwrap_err();
        assert_eq!(err.code(), "missing-weight");
        assert!(graph.forman(EdgeId::from_raw(0)).unwrap().is_none());
    }
}
