use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    curvature::{self, CurvatureArgs, Measure},
    generate::{self, GenerateArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "curv-sim", about = "Graph curvature CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a random geometric graph and write it as JSON.
    Generate(GenerateArgs),
    /// Compute Forman-Ricci curvature for every edge.
    Forman(CurvatureArgs),
    /// Compute Ollivier-Ricci curvature for every edge.
    Ollivier(CurvatureArgs),
    /// Compute both curvatures and report them side by side.
    Curvature(CurvatureArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Forman(args) => curvature::run(&args, Measure::Forman),
        Command::Ollivier(args) => curvature::run(&args, Measure::Ollivier),
        Command::Curvature(args) => curvature::run(&args, Measure::Both),
    }
}
