use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use curv_core::rng::RngHandle;
use curv_graph::{gen_random_geometric, graph_to_json, randomize_edge_weights};
use serde::Serialize;
use tracing::info;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of vertices to sample in the unit square.
    #[arg(long, default_value_t = 50)]
    pub nodes: usize,
    /// Connection radius.
    #[arg(long, default_value_t = 0.2)]
    pub radius: f64,
    /// Seed of the point sampler.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Output path for the graph JSON.
    #[arg(long)]
    pub out: PathBuf,
    /// Lower bound of random edge weights; weights stay unset without it.
    #[arg(long, requires = "max_weight")]
    pub min_weight: Option<f64>,
    /// Upper bound of random edge weights.
    #[arg(long, requires = "min_weight")]
    pub max_weight: Option<f64>,
    /// Optional output path for the sampled vertex positions.
    #[arg(long)]
    pub positions: Option<PathBuf>,
}

/// Substream drawing edge weights, kept apart from the position stream.
const WEIGHT_STREAM: u64 = 1;

#[derive(Debug, Serialize)]
struct PositionRecord {
    node: u64,
    x: f64,
    y: f64,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = RngHandle::from_seed(args.seed);
    let (mut graph, positions) = gen_random_geometric(args.nodes, args.radius, &mut rng)?;
    if let (Some(low), Some(high)) = (args.min_weight, args.max_weight) {
        randomize_edge_weights(&mut graph, low, high, &mut rng.substream(WEIGHT_STREAM))?;
    }
    write_file(&args.out, graph_to_json(&graph)?)?;

    if let Some(path) = &args.positions {
        let records: Vec<PositionRecord> = positions
            .iter()
            .enumerate()
            .map(|(node, [x, y])| PositionRecord {
                node: node as u64,
                x: *x,
                y: *y,
            })
            .collect();
        write_file(path, serde_json::to_string_pretty(&records)?)?;
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        seed = args.seed,
        "random geometric graph written"
    );
    Ok(())
}

pub(crate) fn write_file(path: &Path, contents: String) -> Result<(), Box<dyn Error>> {
    ensure_parent(path)?;
    fs::write(path, contents)?;
    Ok(())
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
