use curv_core::{EdgeId, NodeId};

/// Converts a [`NodeId`] into its slot within the node table.
pub(crate) fn node_index(id: NodeId) -> usize {
    id.as_raw() as usize
}

/// Converts an [`EdgeId`] into its slot within the edge table.
pub(crate) fn edge_index(id: EdgeId) -> usize {
    id.as_raw() as usize
}

/// Creates a [`NodeId`] from a table slot.
pub(crate) fn make_node(index: usize) -> NodeId {
    NodeId::from_raw(index as u64)
}

/// Creates an [`EdgeId`] from a table slot.
pub(crate) fn make_edge(index: usize) -> EdgeId {
    EdgeId::from_raw(index as u64)
}

/// Orders an undirected endpoint pair so the lower identifier comes first.
pub(crate) fn ordered_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
