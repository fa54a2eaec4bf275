//! osmodel - topographical model generator from Ordnance Survey open data.
//!
//! ```text
//! osmodel surface -e terr50_gagg_gb -o snowdon.csv
//! osmodel texture -r vmd_raster -w 2000 -o snowdon.jpg SH 60986 54375
//! ```

mod commands;
mod config;
mod error;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use commands::{SurfaceArgs, TextureArgs};
use config::Config;
use error::Result;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "osmodel", version)]
#[command(about = "Topographical model generator from Ordnance Survey open data", long_about = None)]
struct Cli {
    /// More logging: -v for info, -vv for debug (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML file with dataset locations and cache settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a height surface from elevation data
    ///
    /// The default GRID_REFERENCE is Snowdon summit (SH 60986 54375).
    Surface(SurfaceArgs),

    /// Generate an image from raster data
    ///
    /// The default GRID_REFERENCE is Snowdon summit (SH 60986 54375).
    Texture(TextureArgs),
}

/// Log to stderr so data written to stdout stays clean.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Surface(args) => commands::surface(args, &config),
        Command::Texture(args) => commands::texture(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}
