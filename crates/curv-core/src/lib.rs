#![deny(missing_docs)]
#![doc = "Core traits and data types shared by the discrete curvature crates."]

use std::iter::ExactSizeIterator;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod float_repr;
pub mod provenance;
pub mod rng;
mod types;

pub use errors::{CurvError, ErrorInfo};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::RngHandle;
pub use types::{CurvatureKind, EdgeAttributes};

/// Weight assigned to vertices and edges that carry none.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Identifier for a vertex within a [`WeightedGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Identifier for an undirected edge within a [`WeightedGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// A neighbouring vertex together with the edge that reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Neighbor {
    /// The adjacent vertex.
    pub node: NodeId,
    /// The edge joining the queried vertex to `node`.
    pub edge: EdgeId,
}

/// Structural contract consumed by the curvature calculators.
///
/// Edges are undirected, with no self-loops and no parallel edges. Weights
/// are optional until normalized; setters only fill gaps and never overwrite.
pub trait WeightedGraph: Send + Sync {
    /// Returns an iterator over all vertex identifiers in ascending order.
    fn nodes(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_>;

    /// Returns an iterator over all edge identifiers in ascending order.
    fn edges(&self) -> Box<dyn ExactSizeIterator<Item = EdgeId> + '_>;

    /// Returns the two endpoints of an edge, lower identifier first.
    fn endpoints(&self, edge: EdgeId) -> Result<(NodeId, NodeId), CurvError>;

    /// Returns the vertices adjacent to `node` with their connecting edges.
    fn neighbors(&self, node: NodeId) -> Result<Vec<Neighbor>, CurvError>;

    /// Returns the number of edges incident to `node`.
    fn degree(&self, node: NodeId) -> Result<usize, CurvError> {
        Ok(self.neighbors(node)?.len())
    }

    /// Returns the explicit weight of a vertex, if any.
    fn node_weight(&self, node: NodeId) -> Result<Option<f64>, CurvError>;

    /// Returns the explicit weight of an edge, if any.
    fn edge_weight(&self, edge: EdgeId) -> Result<Option<f64>, CurvError>;

    /// Sets the vertex weight when it is absent. Returns whether a value was written.
    fn fill_node_weight(&mut self, node: NodeId, weight: f64) -> Result<bool, CurvError>;

    /// Sets the edge weight when it is absent. Returns whether a value was written.
    fn fill_edge_weight(&mut self, edge: EdgeId, weight: f64) -> Result<bool, CurvError>;
}
