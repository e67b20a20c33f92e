use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::rng::RngHandle;
use curv_core::{EdgeId, NodeId, WeightedGraph};

use crate::graph::GraphImpl;

/// Vertex positions emitted by [`gen_random_geometric`], indexed like the vertices.
pub type Positions = Vec<[f64; 2]>;

/// Generates a random geometric graph on the unit square.
///
/// `n_nodes` points are drawn uniformly; two vertices are joined whenever their
/// Euclidean distance is at most `radius`. Weights are left unset.
pub fn gen_random_geometric(
    n_nodes: usize,
    radius: f64,
    rng: &mut RngHandle,
) -> Result<(GraphImpl, Positions), CurvError> {
    if n_nodes == 0 {
        return Err(CurvError::Graph(ErrorInfo::new(
            "empty-graph",
            "geometric generator requires at least one node",
        )));
    }
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(CurvError::Graph(
            ErrorInfo::new("invalid-radius", "radius must be finite and non-negative")
                .with_context("radius", radius.to_string()),
        ));
    }

    let mut graph = GraphImpl::new();
    let mut positions = Vec::with_capacity(n_nodes);
    let mut nodes = Vec::with_capacity(n_nodes);
    for _ in 0..n_nodes {
        positions.push([rng.unit(), rng.unit()]);
        nodes.push(graph.add_node(None));
    }

    let radius_sq = radius * radius;
    for i in 0..n_nodes {
        for j in (i + 1)..n_nodes {
            let dx = positions[i][0] - positions[j][0];
            let dy = positions[i][1] - positions[j][1];
            if dx * dx + dy * dy <= radius_sq {
                graph.add_edge(nodes[i], nodes[j], None)?;
            }
        }
    }
    Ok((graph, positions))
}

/// Overwrites every edge weight with a uniform draw from `[low, high)`.
///
/// Callers that also sample positions should hand in a separate substream so
/// the topology does not depend on whether weights were drawn.
pub fn randomize_edge_weights(
    graph: &mut GraphImpl,
    low: f64,
    high: f64,
    rng: &mut RngHandle,
) -> Result<(), CurvError> {
    if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
        return Err(CurvError::Weight(
            ErrorInfo::new("invalid-weight-range", "weights need 0 < low <= high")
                .with_context("low", low.to_string())
                .with_context("high", high.to_string()),
        ));
    }
    let edges: Vec<EdgeId> = graph.edges().collect();
    for edge in edges {
        graph.set_edge_weight(edge, low + (high - low) * rng.unit())?;
    }
    Ok(())
}

/// Builds the path `0 - 1 - ... - (n-1)`.
pub fn path_graph(n_nodes: usize) -> Result<GraphImpl, CurvError> {
    let (mut graph, nodes) = with_nodes(n_nodes);
    for pair in nodes.windows(2) {
        graph.add_edge(pair[0], pair[1], None)?;
    }
    Ok(graph)
}

/// Builds a cycle on `n_nodes >= 3` vertices.
pub fn cycle_graph(n_nodes: usize) -> Result<GraphImpl, CurvError> {
    if n_nodes < 3 {
        return Err(CurvError::Graph(
            ErrorInfo::new("cycle-too-short", "a cycle needs at least three vertices")
                .with_context("nodes", n_nodes.to_string()),
        ));
    }
    let mut graph = path_graph(n_nodes)?;
    graph.add_edge(
        NodeId::from_raw(n_nodes as u64 - 1),
        NodeId::from_raw(0),
        None,
    )?;
    Ok(graph)
}

/// Builds the complete graph on `n_nodes` vertices.
pub fn complete_graph(n_nodes: usize) -> Result<GraphImpl, CurvError> {
    let (mut graph, nodes) = with_nodes(n_nodes);
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            graph.add_edge(*a, *b, None)?;
        }
    }
    Ok(graph)
}

/// Builds a star: vertex 0 joined to `leaves` further vertices.
pub fn star_graph(leaves: usize) -> Result<GraphImpl, CurvError> {
    let (mut graph, nodes) = with_nodes(leaves + 1);
    for leaf in &nodes[1..] {
        graph.add_edge(nodes[0], *leaf, None)?;
    }
    Ok(graph)
}

fn with_nodes(n_nodes: usize) -> (GraphImpl, Vec<NodeId>) {
    let mut graph = GraphImpl::new();
    let nodes = (0..n_nodes).map(|_| graph.add_node(None)).collect();
    (graph, nodes)
}
