use clap::{Args, Parser, Subcommand};
use esynth::engine::config::PartnerPool;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "esynth CLI - combinatorial assembly of candidate molecules from brick and linker fragments, screened by an acceptance model.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel expansion and scoring.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate complexes from a fragment library and write the accepted ones as CSV.
    Enumerate(EnumerateArgs),
    /// Inspect fragment library files.
    Library(LibraryArgs),
}

/// Arguments for the `enumerate` subcommand.
#[derive(Args, Debug)]
pub struct EnumerateArgs {
    // --- Core Arguments ---
    /// Path to the fragment library in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub library: PathBuf,

    /// Path for the CSV table of accepted complexes.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Assembly Overrides ---
    /// Override the number of expansion levels.
    #[arg(short = 'd', long, value_name = "INT")]
    pub max_depth: Option<usize>,

    /// Stop after this many unique complexes.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_complexes: Option<usize>,

    /// Which fragments frontier complexes may be joined with:
    /// 'linkers', 'templates' or 'frontier'.
    #[arg(short, long, value_name = "POOL")]
    pub partners: Option<PartnerPool>,

    /// Keep rejected complexes out of the next expansion level.
    #[arg(long)]
    pub prune_rejected: bool,

    // --- Acceptance Overrides ---
    /// Path to a CSV weight file for the linear acceptance model.
    /// Without a model every unique complex is accepted.
    #[arg(short, long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Override the acceptance threshold; complexes must score strictly above it.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S assembly.max-depth=3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `library` subcommand.
#[derive(Args, Debug)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommands,
}

#[derive(Subcommand, Debug)]
pub enum LibraryCommands {
    /// List every template with its open valence and connection-point rules.
    Inspect {
        /// The fragment library to inspect.
        #[arg(required = true)]
        path: PathBuf,
    },
}
