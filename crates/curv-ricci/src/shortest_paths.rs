//! All-pairs shortest paths over the weighted graph.

use std::collections::BTreeMap;

use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::{NodeId, WeightedGraph};
use tracing::debug;

/// Dense row index for the alive vertices of a graph, in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeIndex {
    ids: Vec<NodeId>,
    positions: BTreeMap<NodeId, usize>,
}

impl NodeIndex {
    /// Indexes every vertex of `graph`.
    pub fn from_graph<G>(graph: &G) -> Self
    where
        G: WeightedGraph + ?Sized,
    {
        let ids: Vec<NodeId> = graph.nodes().collect();
        let positions = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self { ids, positions }
    }

    /// Number of indexed vertices.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when no vertex is indexed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the row of a vertex.
    pub fn position(&self, node: NodeId) -> Result<usize, CurvError> {
        self.positions.get(&node).copied().ok_or_else(|| {
            CurvError::Graph(
                ErrorInfo::new("unknown-node", "node is not part of the index")
                    .with_context("node", node.as_raw().to_string()),
            )
        })
    }

    /// Returns the vertex stored at a row.
    pub fn node(&self, position: usize) -> Option<NodeId> {
        self.ids.get(position).copied()
    }
}

/// Dense, row-major square matrix of path costs.
///
/// `f64::INFINITY` marks an unreachable pair and is never replaced by a
/// finite placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Creates an `size × size` matrix with zero diagonal and infinite off-diagonal entries.
    pub fn unreachable(size: usize) -> Self {
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { size, data }
    }

    /// Builds a matrix from explicit rows. Every row must have `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CurvError> {
        let size = rows.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(CurvError::Transport(
                ErrorInfo::new("non-square-cost", "cost matrix must be square")
                    .with_context("row", row.to_string())
                    .with_context("len", bad.len().to_string())
                    .with_context("expected", size.to_string()),
            ));
        }
        Ok(Self {
            size,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the entry at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.size + j] = value;
    }

    /// Returns true when `(i, j)` is joined by a finite path.
    pub fn is_reachable(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_finite()
    }
}

/// Computes all-pairs shortest path costs with Floyd–Warshall.
///
/// Edge weights are used directly as traversal costs and must already be
/// present and strictly positive. Runs in `O(|V|³)` time and `O(|V|²)` space.
pub fn all_pairs_shortest_paths<G>(graph: &G) -> Result<(NodeIndex, DistanceMatrix), CurvError>
where
    G: WeightedGraph + ?Sized,
{
    let index = NodeIndex::from_graph(graph);
    let n = index.len();
    let mut dist = DistanceMatrix::unreachable(n);

    for edge in graph.edges() {
        let (a, b) = graph.endpoints(edge)?;
        let weight = graph.edge_weight(edge)?.ok_or_else(|| {
            CurvError::Weight(
                ErrorInfo::new("missing-weight", "edge has no weight")
                    .with_context("edge", edge.as_raw().to_string()),
            )
        })?;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(CurvError::Weight(
                ErrorInfo::new("non-positive-weight", "edge costs must be strictly positive")
                    .with_context("edge", edge.as_raw().to_string())
                    .with_context("weight", weight.to_string()),
            ));
        }
        let (i, j) = (index.position(a)?, index.position(b)?);
        if weight < dist.get(i, j) {
            dist.set(i, j, weight);
            dist.set(j, i, weight);
        }
    }

    for k in 0..n {
        for i in 0..n {
            let via = dist.get(i, k);
            if via.is_infinite() {
                continue;
            }
            for j in 0..n {
                let candidate = via + dist.get(k, j);
                if candidate < dist.get(i, j) {
                    dist.set(i, j, candidate);
                }
            }
        }
    }

    debug!(nodes = n, "computed all-pairs shortest paths");
    Ok((index, dist))
}
