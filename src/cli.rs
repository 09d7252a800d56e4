//! Command line interface definition

use clap::{ArgAction, Args, Parser, Subcommand};
use patune_core::Flavor;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

#[derive(Parser, Debug)]
#[command(name = "patune")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Generate G-code for a pressure advance tuning tower", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log level selected by the verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::WARN,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the tower G-code to a file or stdout
    Generate(GenerateArgs),
    /// Print the height and pressure advance of every layer
    Schedule {
        #[command(flatten)]
        config: ConfigArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a measured height back to a pressure advance value
    Lookup {
        /// Height of the best-looking layer, measured from the bed (mm)
        #[arg(long)]
        height: f64,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Write a config file with the default parameters
    InitConfig {
        /// Destination (.toml or .json)
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (.toml or .json). Defaults to the user config when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Firmware flavor (klipper or marlin)
    #[arg(long)]
    pub flavor: Option<Flavor>,

    /// Prepend comments describing the tower
    #[arg(long)]
    pub header: bool,

    /// Number of swept layers
    #[arg(long)]
    pub layers: Option<u32>,

    /// Pressure advance of the first swept layer
    #[arg(long, allow_hyphen_values = true)]
    pub pa_min: Option<f64>,

    /// Pressure advance of the finishing layers
    #[arg(long, allow_hyphen_values = true)]
    pub pa_max: Option<f64>,

    /// Nozzle temperature (°C)
    #[arg(long)]
    pub nozzle_temp: Option<f64>,

    /// Bed temperature (°C)
    #[arg(long)]
    pub bed_temp: Option<f64>,
}
