use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Args;
use curv_graph::{graph_from_json, graph_to_json, GraphImpl};
use curv_ricci::{
    compute_forman, compute_ollivier_with, provenance_for, CurvatureConfig, CurvatureReport,
    SolverConfig, DEFAULT_PRECISION,
};
use tracing::info;

use super::generate::{ensure_parent, write_file};

#[derive(Args, Debug)]
pub struct CurvatureArgs {
    /// Graph JSON produced by `curv-sim generate` or `graph_to_json`.
    #[arg(long)]
    pub graph: PathBuf,
    /// YAML configuration; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Fail on missing weights instead of filling them with 1.
    #[arg(long)]
    pub no_fix: bool,
    /// Lazy random walk idleness for the Ollivier pass.
    #[arg(long)]
    pub idleness: Option<f64>,
    /// Worker threads for the Ollivier pass.
    #[arg(long)]
    pub threads: Option<usize>,
    /// Use the approximate Sinkhorn solver with this regularization.
    #[arg(long)]
    pub sinkhorn: Option<f64>,
    /// Output path for the JSON report.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional CSV export of the per-edge values.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Decimal places written to the CSV export.
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    pub precision: usize,
    /// Optional path for the graph JSON with curvature attached.
    #[arg(long)]
    pub save_graph: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Forman,
    Ollivier,
    Both,
}

impl Measure {
    fn forman(self) -> bool {
        matches!(self, Measure::Forman | Measure::Both)
    }

    fn ollivier(self) -> bool {
        matches!(self, Measure::Ollivier | Measure::Both)
    }
}

pub fn run(args: &CurvatureArgs, measure: Measure) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    let mut graph = load_graph(&args.graph)?;

    if measure.forman() {
        compute_forman(&mut graph, config.fix_weights)?;
    }
    if measure.ollivier() {
        compute_ollivier_with(&mut graph, &config)?;
    }

    let provenance = provenance_for(&graph, &config, None)?;
    let report = CurvatureReport::from_graph(&graph, provenance)?;
    write_file(&args.out, report.to_json()?)?;
    if let Some(path) = &args.csv {
        ensure_parent(path)?;
        let writer = BufWriter::new(File::create(path)?);
        report.write_csv(writer, args.precision)?;
    }
    if let Some(path) = &args.save_graph {
        write_file(path, graph_to_json(&graph)?)?;
    }

    info!(
        edges = report.edges.len(),
        forman_mean = report.forman.mean,
        ollivier_mean = report.ollivier.mean,
        out = %args.out.display(),
        "curvature report written"
    );
    Ok(())
}

fn resolve_config(args: &CurvatureArgs) -> Result<CurvatureConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => CurvatureConfig::load(path)?,
        None => CurvatureConfig::default(),
    };
    if args.no_fix {
        config.fix_weights = false;
    }
    if let Some(idleness) = args.idleness {
        config.idleness = idleness;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(regularization) = args.sinkhorn {
        config.solver = match config.solver {
            SolverConfig::Sinkhorn {
                max_iterations,
                threshold,
                ..
            } => SolverConfig::Sinkhorn {
                regularization,
                max_iterations,
                threshold,
            },
            SolverConfig::Exact => SolverConfig::sinkhorn(regularization),
        };
    }
    config.validate()?;
    Ok(config)
}

fn load_graph(path: &Path) -> Result<GraphImpl, Box<dyn Error>> {
    let json = fs::read_to_string(path)?;
    Ok(graph_from_json(&json)?)
}
