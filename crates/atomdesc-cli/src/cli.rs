use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "atomdesc CLI - Compute Coulomb matrix descriptors and cell-list neighbor queries for atomic structures.",
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

    /// Set the number of threads used to featurize structures in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute Coulomb matrix feature vectors for every structure in a file.
    Featurize(FeaturizeArgs),
    /// List the neighbors of atoms within a cutoff radius using a cell list.
    Neighbors(NeighborsArgs),
}

/// Arguments for the `featurize` subcommand.
#[derive(Args, Debug)]
pub struct FeaturizeArgs {
    // --- Core Arguments ---
    /// Path to the input structure file in XYZ format (may hold many frames).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output CSV file, one row per structure.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Descriptor Overrides ---
    /// Override the maximum number of atoms, which fixes the feature length.
    /// Defaults to the size of the largest input structure.
    #[arg(short, long, value_name = "INT")]
    pub n_atoms_max: Option<usize>,

    /// Override the permutation strategy: none, sorted_l2, eigenspectrum or random.
    #[arg(short, long, value_name = "NAME")]
    pub permutation: Option<String>,

    /// Override the noise standard deviation for the random permutation.
    #[arg(long, value_name = "FLOAT")]
    pub sigma: Option<f64>,

    /// Override the random seed for the random permutation.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S coulomb-matrix.seed=7
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `neighbors` subcommand.
#[derive(Args, Debug)]
pub struct NeighborsArgs {
    /// Path to the input structure file in XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Cutoff radius in Angstroms. Use 'inf' to list every pair.
    #[arg(short, long, required = true, value_name = "FLOAT")]
    pub cutoff: f64,

    /// Index of the frame to use from a multi-frame file.
    #[arg(short, long, default_value_t = 0, value_name = "INT")]
    pub frame: usize,

    /// Only list the neighbors of this atom. Lists all atoms when omitted.
    #[arg(short, long, value_name = "INT")]
    pub atom: Option<usize>,

    /// Write the neighbor table to a CSV file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
