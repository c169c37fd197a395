use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the kfir binary.
#[derive(Parser, Debug)]
#[command(
    name = "kfir",
    version,
    about = "Semantic checks over a resolved Kotlin declaration graph"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check every source file of a graph and print the diagnostics.
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Resolved declaration graph, as written by the upstream producer.
    pub graph: PathBuf,

    /// Checker options; defaults to a `kfir.json` next to the graph.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long = "no-color", alias = "noColor")]
    pub no_color: bool,

    /// Number of files checked in parallel (defaults to the number of CPUs).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Report every warning as an error, overriding the config file.
    #[arg(long = "warnings-as-errors", alias = "warningsAsErrors")]
    pub warnings_as_errors: bool,

    /// Diagnostic names to suppress in addition to the config file.
    #[arg(long, value_delimiter = ',')]
    pub suppress: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
