use curv_core::errors::CurvError;
use curv_core::WeightedGraph;
use sha2::{Digest, Sha256};

use crate::graph::GraphImpl;

/// Computes the canonical hash of the weighted structure of a graph.
///
/// Covers vertex identifiers, vertex weights, the undirected edge set and the
/// edge weights. Curvature values are derived data and are excluded, as is the
/// order in which edges were inserted.
pub fn canonical_hash(graph: &GraphImpl) -> Result<String, CurvError> {
    let mut hasher = Sha256::new();

    let nodes: Vec<_> = graph.nodes().collect();
    hasher.update((nodes.len() as u64).to_le_bytes());
    for node in nodes {
        hasher.update(node.as_raw().to_le_bytes());
        encode_weight(graph.node_weight(node)?, &mut hasher);
    }

    let mut edges = Vec::new();
    for edge in graph.edges() {
        let (source, target) = graph.endpoints(edge)?;
        edges.push((source.as_raw(), target.as_raw(), graph.edge_weight(edge)?));
    }
    edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    hasher.update((edges.len() as u64).to_le_bytes());
    for (source, target, weight) in edges {
        hasher.update(source.to_le_bytes());
        hasher.update(target.to_le_bytes());
        encode_weight(weight, &mut hasher);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn encode_weight(weight: Option<f64>, hasher: &mut Sha256) {
    match weight {
        Some(value) => {
            hasher.update(b"w:some");
            hasher.update(value.to_bits().to_le_bytes());
        }
        None => hasher.update(b"w:none"),
    }
}
