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
    author,
    version,
    about = "extgeom - read, write and classify CRYSTAL external geometry (.gui) files.",
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

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a geometry file and print its structure and symmetry as JSON.
    Read(ReadArgs),
    /// Write a geometry file from a JSON structure, deriving symmetry if none is given.
    Write(WriteArgs),
    /// Print the header codes CRYSTAL uses for a Hall setting.
    Classify(ClassifyArgs),
}

/// Arguments for the `read` subcommand.
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Path to the geometry file (e.g., fort.34 or main.gui).
    #[arg(required = true, value_name = "FILE")]
    pub input: PathBuf,

    /// Reject files whose atom list is not closed under the symmetry operations.
    #[arg(long)]
    pub verify_closure: bool,

    /// Cartesian distance within which an atom image must match an atom.
    #[arg(long, value_name = "FLOAT")]
    pub closure_tolerance: Option<f64>,
}

/// Arguments for the `write` subcommand.
#[derive(Args, Debug)]
pub struct WriteArgs {
    /// JSON structure: a canonical dictionary, an atoms object or a fractional cell.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output geometry file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// JSON symmetry record to write instead of deriving one.
    #[arg(short, long, value_name = "PATH")]
    pub symmetry: Option<PathBuf>,

    /// Override the symmetry search length tolerance.
    #[arg(long, value_name = "FLOAT")]
    pub symprec: Option<f64>,

    /// Override the symmetry search angle tolerance in degrees.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub angle_tolerance: Option<f64>,

    /// Write operations in canonical lexicographic order.
    #[arg(long)]
    pub sort_operations: bool,
}

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Hall number of the setting, 1 to 530.
    #[arg(required = true, value_name = "HALL_NUMBER")]
    pub hall_number: i32,
}
