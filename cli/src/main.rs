mod cli;
mod commands;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};
use wienmap::DatasetConfig;

use cli::{Cli, Commands};
use commands::{download, inspect, render};

/// Log filter from `RUST_LOG`, falling back to the `-v` count.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Config from `--config`, or the built-in Vienna defaults.
pub(crate) fn load_config(cli: &Cli) -> Result<DatasetConfig> {
    match &cli.config {
        Some(path) => DatasetConfig::from_json_file(path),
        None => Ok(DatasetConfig::default()),
    }
}

pub fn run() -> Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Download(args) => download::run(&cli, args),
        Commands::Inspect(args) => inspect::run(&cli, args),
        Commands::Render(args) => render::run(&cli, args),
    }
}

fn main() -> Result<()> { run() }
