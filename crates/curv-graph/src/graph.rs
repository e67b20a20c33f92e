use std::collections::BTreeMap;

use curv_core::{
    errors::{CurvError, ErrorInfo},
    CurvatureKind, EdgeAttributes, EdgeId, Neighbor, NodeId, WeightedGraph,
};
use tracing::debug;

use crate::ids::{edge_index, make_edge, make_node, node_index, ordered_pair};

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) alive: bool,
    pub(crate) weight: Option<f64>,
    adjacency: BTreeMap<NodeId, EdgeId>,
}

impl NodeRecord {
    fn new(weight: Option<f64>) -> Self {
        Self {
            alive: true,
            weight,
            adjacency: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord {
    pub(crate) alive: bool,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) weight: Option<f64>,
    pub(crate) forman: Option<f64>,
    pub(crate) ollivier: Option<f64>,
}

impl EdgeRecord {
    fn new(source: NodeId, target: NodeId, weight: Option<f64>) -> Self {
        Self {
            alive: true,
            source,
            target,
            weight,
            forman: None,
            ollivier: None,
        }
    }

    fn attributes(&self) -> EdgeAttributes {
        EdgeAttributes {
            weight: self.weight,
            forman: self.forman,
            ollivier: self.ollivier,
        }
    }
}

/// Undirected weighted graph with typed per-edge curvature slots.
///
/// Identifiers are slot indices and stay stable across removals; removed
/// vertices and edges leave tombstones behind. Self-loops and parallel edges
/// are rejected on insertion.
#[derive(Debug, Clone, Default)]
pub struct GraphImpl {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    pairs: BTreeMap<(NodeId, NodeId), EdgeId>,
}

impl GraphImpl {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of alive vertices.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.alive).count()
    }

    /// Returns the number of alive edges.
    pub fn edge_count(&self) -> usize {
        self.pairs.len()
    }

    /// Adds a vertex, optionally carrying an explicit weight.
    pub fn add_node(&mut self, weight: Option<f64>) -> NodeId {
        let id = make_node(self.nodes.len());
        self.nodes.push(NodeRecord::new(weight));
        id
    }

    /// Adds an undirected edge between two distinct existing vertices.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: Option<f64>,
    ) -> Result<EdgeId, CurvError> {
        if a == b {
            return Err(graph_error("self-loop", "edges must join two distinct vertices")
                .with_context("node", a.as_raw()));
        }
        self.node(a)?;
        self.node(b)?;
        let (source, target) = ordered_pair(a, b);
        if let Some(existing) = self.pairs.get(&(source, target)) {
            return Err(graph_error("duplicate-edge", "edge already exists")
                .with_context("edge", existing.as_raw())
                .with_context("source", source.as_raw())
                .with_context("target", target.as_raw()));
        }
        let id = make_edge(self.edges.len());
        self.node_mut(source)?.adjacency.insert(target, id);
        self.node_mut(target)?.adjacency.insert(source, id);
        self.pairs.insert((source, target), id);
        self.edges.push(EdgeRecord::new(source, target, weight));
        Ok(id)
    }

    /// Removes an edge. Its identifier is never reused.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(), CurvError> {
        let (source, target) = {
            let record = self.edge(edge)?;
            (record.source, record.target)
        };
        self.node_mut(source)?.adjacency.remove(&target);
        self.node_mut(target)?.adjacency.remove(&source);
        self.pairs.remove(&(source, target));
        if let Some(record) = self.edges.get_mut(edge_index(edge)) {
            record.alive = false;
        }
        Ok(())
    }

    /// Removes a vertex together with every incident edge.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), CurvError> {
        let incident: Vec<EdgeId> = self.node(node)?.adjacency.values().copied().collect();
        for edge in incident {
            self.remove_edge(edge)?;
        }
        self.node_mut(node)?.alive = false;
        Ok(())
    }

    /// Overwrites the weight of a vertex.
    pub fn set_node_weight(&mut self, node: NodeId, weight: f64) -> Result<(), CurvError> {
        self.node_mut(node)?.weight = Some(weight);
        Ok(())
    }

    /// Overwrites the weight of an edge.
    pub fn set_edge_weight(&mut self, edge: EdgeId, weight: f64) -> Result<(), CurvError> {
        self.edge_mut(edge)?.weight = Some(weight);
        Ok(())
    }

    /// Looks up the edge joining two vertices, in either orientation.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.pairs.get(&ordered_pair(a, b)).copied()
    }

    /// Returns the Forman-Ricci curvature stored on an edge.
    pub fn forman(&self, edge: EdgeId) -> Result<Option<f64>, CurvError> {
        Ok(self.edge(edge)?.forman)
    }

    /// Returns the Ollivier-Ricci curvature stored on an edge.
    pub fn ollivier(&self, edge: EdgeId) -> Result<Option<f64>, CurvError> {
        Ok(self.edge(edge)?.ollivier)
    }

    /// Returns the weight and both curvature values of an edge.
    pub fn edge_attributes(&self, edge: EdgeId) -> Result<EdgeAttributes, CurvError> {
        Ok(self.edge(edge)?.attributes())
    }

    /// Writes a freshly computed curvature map onto the edges.
    ///
    /// Every identifier is checked before anything is written, so a failed
    /// call leaves the graph untouched. Values already stored for `kind`
    /// are overwritten.
    pub fn apply_curvature(
        &mut self,
        kind: CurvatureKind,
        values: &BTreeMap<EdgeId, f64>,
    ) -> Result<(), CurvError> {
        for edge in values.keys() {
            self.edge(*edge)?;
        }
        for (edge, value) in values {
            let record = self.edge_mut(*edge)?;
            match kind {
                CurvatureKind::Forman => record.forman = Some(*value),
                CurvatureKind::Ollivier => record.ollivier = Some(*value),
            }
        }
        debug!(kind = kind.label(), edges = values.len(), "curvature applied");
        Ok(())
    }

    pub(crate) fn node_records(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub(crate) fn edge_records(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Appends an edge tombstone so identifiers line up after deserialization.
    pub(crate) fn push_dead_edge(&mut self, source: NodeId, target: NodeId) {
        let mut record = EdgeRecord::new(source, target, None);
        record.alive = false;
        self.edges.push(record);
    }

    pub(crate) fn restore_curvature(
        &mut self,
        edge: EdgeId,
        forman: Option<f64>,
        ollivier: Option<f64>,
    ) -> Result<(), CurvError> {
        let record = self.edge_mut(edge)?;
        record.forman = forman;
        record.ollivier = ollivier;
        Ok(())
    }

    fn node(&self, id: NodeId) -> Result<&NodeRecord, CurvError> {
        self.nodes
            .get(node_index(id))
            .filter(|record| record.alive)
            .ok_or_else(|| {
                graph_error("unknown-node", "node does not exist").with_context("node", id.as_raw())
            })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, CurvError> {
        self.nodes
            .get_mut(node_index(id))
            .filter(|record| record.alive)
            .ok_or_else(|| {
                graph_error("unknown-node", "node does not exist").with_context("node", id.as_raw())
            })
    }

    fn edge(&self, id: EdgeId) -> Result<&EdgeRecord, CurvError> {
        self.edges
            .get(edge_index(id))
            .filter(|record| record.alive)
            .ok_or_else(|| {
                graph_error("unknown-edge", "edge does not exist").with_context("edge", id.as_raw())
            })
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeRecord, CurvError> {
        self.edges
            .get_mut(edge_index(id))
            .filter(|record| record.alive)
            .ok_or_else(|| {
                graph_error("unknown-edge", "edge does not exist").with_context("edge", id.as_raw())
            })
    }
}

impl WeightedGraph for GraphImpl {
    fn nodes(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_> {
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.alive)
            .map(|(idx, _)| make_node(idx))
            .collect();
        Box::new(ids.into_iter())
    }

    fn edges(&self) -> Box<dyn ExactSizeIterator<Item = EdgeId> + '_> {
        let ids: Vec<EdgeId> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.alive)
            .map(|(idx, _)| make_edge(idx))
            .collect();
        Box::new(ids.into_iter())
    }

    fn endpoints(&self, edge: EdgeId) -> Result<(NodeId, NodeId), CurvError> {
        let record = self.edge(edge)?;
        Ok((record.source, record.target))
    }

    fn neighbors(&self, node: NodeId) -> Result<Vec<Neighbor>, CurvError> {
        Ok(self
            .node(node)?
            .adjacency
            .iter()
            .map(|(node, edge)| Neighbor {
                node: *node,
                edge: *edge,
            })
            .collect())
    }

    fn degree(&self, node: NodeId) -> Result<usize, CurvError> {
        Ok(self.node(node)?.adjacency.len())
    }

    fn node_weight(&self, node: NodeId) -> Result<Option<f64>, CurvError> {
        Ok(self.node(node)?.weight)
    }

    fn edge_weight(&self, edge: EdgeId) -> Result<Option<f64>, CurvError> {
        Ok(self.edge(edge)?.weight)
    }

    fn fill_node_weight(&mut self, node: NodeId, weight: f64) -> Result<bool, CurvError> {
        let record = self.node_mut(node)?;
        if record.weight.is_some() {
            return Ok(false);
        }
        record.weight = Some(weight);
        Ok(true)
    }

    fn fill_edge_weight(&mut self, edge: EdgeId, weight: f64) -> Result<bool, CurvError> {
        let record = self.edge_mut(edge)?;
        if record.weight.is_some() {
            return Ok(false);
        }
        record.weight = Some(weight);
        Ok(true)
    }
}

fn graph_error(code: impl Into<String>, message: impl Into<String>) -> CurvError {
    CurvError::Graph(ErrorInfo::new(code, message))
}

trait ContextExt {
    fn with_context(self, key: impl Into<String>, value: impl ToString) -> CurvError;
}

impl ContextExt for CurvError {
    fn with_context(self, key: impl Into<String>, value: impl ToString) -> CurvError {
        match self {
            CurvError::Graph(info) => CurvError::Graph(info.with_context(key, value.to_string())),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_keeps_identifiers_stable() {
        let mut graph = GraphImpl::new();
        let a = graph.add_node(None);
        let b = graph.add_node(None);
        let c = graph.add_node(None);
        let ab = graph.add_edge(a, b, None).unwrap();
        let bc = graph.add_edge(b, c, Some(2.0)).unwrap();

        graph.remove_node(a).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge_attributes(ab).is_err());
        assert_eq!(graph.edge_weight(bc).unwrap(), Some(2.0));
        assert_eq!(graph.degree(b).unwrap(), 1);

        let d = graph.add_node(None);
        assert_eq!(d.as_raw(), 3);
    }

    #[test]
    fn apply_curvature_is_all_or_nothing() {
        let mut graph = GraphImpl::new();
        let a = graph.add_node(None);
        let b = graph.add_node(None);
        let ab = graph.add_edge(a, b, None).unwrap();

        let mut values = BTreeMap::new();
        values.insert(ab, 0.25);
        values.insert(EdgeId::from_raw(9), 1.0);
        let err = graph
            .apply_curvature(CurvatureKind::Forman, &values)
            .unwrap_err();
        assert_eq!(err.code(), "unknown-edge");
        assert_eq!(graph.forman(ab).unwrap(), None);

        values.remove(&EdgeId::from_raw(9));
        graph
            .apply_curvature(CurvatureKind::Forman, &values)
            .unwrap();
        assert_eq!(graph.forman(ab).unwrap(), Some(0.25));
        assert_eq!(graph.ollivier(ab).unwrap(), None);
    }
}
