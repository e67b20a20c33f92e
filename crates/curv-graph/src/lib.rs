#![deny(missing_docs)]

//! Undirected weighted graph storage implementing the `curv-core` contracts.
//!
//! Besides the graph itself the crate owns weight normalization, structural
//! hashing, serialization and a handful of deterministic generators.

mod generators;
mod graph;
mod hash;
mod ids;
mod normalize;
mod serialization;

pub use generators::{
    complete_graph, cycle_graph, gen_random_geometric, path_graph, randomize_edge_weights,
    star_graph, Positions,
};
pub use graph::GraphImpl;
pub use hash::canonical_hash;
pub use normalize::{normalize_weights, validate_weights, NormalizeOutcome};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{
    graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json, GRAPH_SCHEMA,
};
