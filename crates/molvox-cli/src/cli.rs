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
    version,
    about = "molvox - convert molecular structures into multi-channel voxel occupancy grids for 3D CNNs.",
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

    /// Set the number of threads for parallel voxelization.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build occupancy grids from structure files and save them as .npy arrays.
    Voxelize(VoxelizeArgs),
    /// Show atom counts, extent, and the grid shape a structure would produce.
    Inspect(InspectArgs),
}

/// Grid options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the voxel edge length in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub voxel_size: Option<f64>,

    /// Override the tracked elements, one channel each, in order (e.g. C,N,O,S).
    #[arg(short, long, value_delimiter = ',', value_name = "SYMBOLS")]
    pub elements: Option<Vec<String>>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grid.voxel-size=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `voxelize` subcommand.
#[derive(Args, Debug)]
pub struct VoxelizeArgs {
    /// Input structure file(s) (.pdb, .ent, .mol2).
    #[arg(short, long, required = true, num_args = 1.., value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Output .npy file, or an output directory when several inputs are given.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Write the array as (channel, x, y, z) instead of (x, y, z, channel).
    #[arg(long)]
    pub channels_first: bool,

    /// Also export occupied voxels as CSV for visualization.
    /// A directory when several inputs are given.
    #[arg(long, value_name = "PATH")]
    pub voxels_csv: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input structure file (.pdb, .ent, .mol2).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub grid: GridArgs,
}
