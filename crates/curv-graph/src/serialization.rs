use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::provenance::SchemaVersion;
use curv_core::{NodeId, WeightedGraph};
use serde::{Deserialize, Serialize};

use crate::graph::GraphImpl;

/// Schema version written alongside serialized graphs.
pub const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &GraphImpl) -> Result<Vec<u8>, CurvError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| CurvError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<GraphImpl, CurvError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes)
        .map_err(|err| CurvError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &GraphImpl) -> Result<String, CurvError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| CurvError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
///
/// Weights and curvature fields may be omitted; missing weights are left
/// unset for the normalizer to fill.
pub fn graph_from_json(json: &str) -> Result<GraphImpl, CurvError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| CurvError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    #[serde(default)]
    schema_version: SchemaVersion,
    nodes: Vec<SerializableNode>,
    edges: Vec<SerializableEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableNode {
    #[serde(default = "alive_default")]
    alive: bool,
    #[serde(default)]
    weight: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableEdge {
    #[serde(default = "alive_default")]
    alive: bool,
    source: u64,
    target: u64,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default, with = "curv_core::float_repr")]
    forman: Option<f64>,
    #[serde(default, with = "curv_core::float_repr")]
    ollivier: Option<f64>,
}

fn alive_default() -> bool {
    true
}

impl SerializableGraph {
    fn from_graph(graph: &GraphImpl) -> Self {
        let nodes = graph
            .node_records()
            .iter()
            .map(|node| SerializableNode {
                alive: node.alive,
                weight: node.weight,
            })
            .collect();
        let edges = graph
            .edge_records()
            .iter()
            .map(|edge| SerializableEdge {
                alive: edge.alive,
                source: edge.source.as_raw(),
                target: edge.target.as_raw(),
                weight: edge.weight,
                forman: edge.forman,
                ollivier: edge.ollivier,
            })
            .collect();
        Self {
            schema_version: GRAPH_SCHEMA,
            nodes,
            edges,
        }
    }

    fn into_graph(self) -> Result<GraphImpl, CurvError> {
        if self.schema_version.major != GRAPH_SCHEMA.major {
            return Err(CurvError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported graph schema version")
                    .with_context("found", self.schema_version.major.to_string())
                    .with_context("expected", GRAPH_SCHEMA.major.to_string()),
            ));
        }
        let mut graph = GraphImpl::new();
        let mut dead = Vec::new();
        for node in &self.nodes {
            let id = graph.add_node(node.weight);
            if !node.alive {
                dead.push(id);
            }
        }
        for edge in self.edges {
            let source = NodeId::from_raw(edge.source);
            let target = NodeId::from_raw(edge.target);
            if edge.alive {
                let id = graph.add_edge(source, target, edge.weight)?;
                graph.restore_curvature(id, edge.forman, edge.ollivier)?;
            } else {
                graph.push_dead_edge(source, target);
            }
        }
        // Tombstoned vertices must not carry alive edges.
        for id in dead {
            if graph.degree(id)? > 0 {
                return Err(CurvError::Serde(
                    ErrorInfo::new("dead-endpoint", "alive edge touches a removed vertex")
                        .with_context("node", id.as_raw().to_string()),
                ));
            }
            graph.remove_node(id)?;
        }
        Ok(graph)
    }
}
