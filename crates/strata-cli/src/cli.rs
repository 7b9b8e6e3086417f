use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strata_diff::DiffStrategy;

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Structural diff and patch for JSON and TOML documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reject inputs nesting deeper than this
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Mapping diff strategy
    #[arg(long, global = true)]
    pub strategy: Option<StrategyArg>,

    /// Treat floats within this absolute distance as equivalent
    #[arg(long, global = true)]
    pub tolerance: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    AddDifferent,
    RemoveEquivalent,
}

impl From<StrategyArg> for DiffStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::AddDifferent => DiffStrategy::AddDifferent,
            StrategyArg::RemoveEquivalent => DiffStrategy::RemoveEquivalent,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the diff between two documents
    Diff(DiffArgs),
    /// Apply a diff to a document
    Apply(ApplyArgs),
    /// Check whether two documents are equivalent
    Equiv(EquivArgs),
    /// Check diff and apply against a fixture file
    Verify(VerifyArgs),
    /// Time repeated diffs over a fixture file
    Profile(ProfileArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub orig: PathBuf,
    pub other: PathBuf,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub orig: PathBuf,
    pub diff: PathBuf,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct EquivArgs {
    pub a: PathBuf,
    pub b: PathBuf,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub fixtures: PathBuf,
}

#[derive(Args)]
pub struct ProfileArgs {
    pub fixtures: PathBuf,
    #[arg(short = 'n', long, default_value = "1000")]
    pub iterations: usize,
}
